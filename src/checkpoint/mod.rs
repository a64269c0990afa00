//! Serializable snapshots of an entity and its transition history.
//!
//! The engine never persists anything. A checkpoint is the hand-off format for
//! whatever storage layer the caller runs: it bundles the latest entity
//! snapshot with the history that produced it, in JSON or a compact binary
//! encoding.

use crate::core::{Lens, State, StateHistory};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable checkpoint of an entity's lifecycle.
/// Does NOT include the transition table, lens, or handler (not serializable).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: DeserializeOwned"))]
pub struct Checkpoint<T, S: State> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Latest entity snapshot
    pub entity: T,

    /// Transitions that led to the snapshot
    pub history: StateHistory<S>,
}

impl<T, S: State> Checkpoint<T, S> {
    /// Capture `entity` and the history that produced it.
    pub fn new(entity: T, history: StateHistory<S>) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            entity,
            history,
        }
    }

    /// Check that the entity's state matches the last recorded transition.
    ///
    /// A checkpoint with an empty history is always consistent.
    pub fn validate<L>(&self, lens: &L) -> Result<(), CheckpointError>
    where
        L: Lens<T, S> + ?Sized,
    {
        let Some(expected) = self.history.current() else {
            return Ok(());
        };

        let actual = lens.read(&self.entity);
        if &actual != expected {
            return Err(CheckpointError::StateMismatch {
                entity_state: actual.name().to_string(),
                history_state: expected.name().to_string(),
            });
        }
        Ok(())
    }

}

/// Leading fields shared by every checkpoint format version.
///
/// Decoded on its own first, so a checkpoint from another version is rejected
/// as unsupported even when the rest of its layout no longer matches.
#[derive(Deserialize)]
struct Header {
    version: u32,
}

fn check_version(found: u32) -> Result<(), CheckpointError> {
    if found != CHECKPOINT_VERSION {
        return Err(CheckpointError::UnsupportedVersion {
            found,
            supported: CHECKPOINT_VERSION,
        });
    }
    Ok(())
}

impl<T, S> Checkpoint<T, S>
where
    T: Serialize + DeserializeOwned,
    S: State,
{
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::encode("json", e))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let header: Header =
            serde_json::from_str(json).map_err(|e| CheckpointError::decode("json", e))?;
        check_version(header.version)?;

        serde_json::from_str(json).map_err(|e| CheckpointError::decode("json", e))
    }

    /// Encode as compact binary (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::encode("bincode", e))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        // `version` is the first field, encoded as a fixed-width u32.
        let version: u32 =
            bincode::deserialize(bytes).map_err(|e| CheckpointError::decode("bincode", e))?;
        check_version(version)?;

        bincode::deserialize(bytes).map_err(|e| CheckpointError::decode("bincode", e))
    }
}
