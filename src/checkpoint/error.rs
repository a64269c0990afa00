//! Checkpoint error types.

use thiserror::Error;

/// Errors that can occur while encoding, decoding, or validating a checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckpointError {
    /// The checkpoint could not be encoded in the requested format
    #[error("Failed to encode checkpoint as {format}: {message}")]
    Encode { format: &'static str, message: String },

    /// The input is not a checkpoint in the requested format
    #[error("Failed to decode checkpoint from {format}: {message}")]
    Decode { format: &'static str, message: String },

    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The entity's state disagrees with where its history ends
    #[error("Entity is in state '{entity_state}' but history ends in '{history_state}'")]
    StateMismatch {
        entity_state: String,
        history_state: String,
    },
}

impl CheckpointError {
    pub(crate) fn encode(format: &'static str, error: impl ToString) -> Self {
        Self::Encode {
            format,
            message: error.to_string(),
        }
    }

    pub(crate) fn decode(format: &'static str, error: impl ToString) -> Self {
        Self::Decode {
            format,
            message: error.to_string(),
        }
    }
}
