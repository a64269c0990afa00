//! Core State trait for lifecycle states.
//!
//! A state is one value of a closed enumeration describing where an entity
//! sits in its lifecycle. The engine keys its transition table on states, so
//! they must be hashable as well as comparable.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for lifecycle states.
///
/// All methods are pure. States are immutable values; an entity moves between
/// them only by being replaced with a new snapshot.
///
/// # Required Traits
///
/// - `Clone`: states are copied into history records and errors
/// - `Eq` + `Hash`: states are transition table keys
/// - `Debug`: states appear in diagnostics
/// - `Serialize` + `Deserialize`: states travel inside checkpoints
///
/// # Example
///
/// ```rust
/// use lifecycle::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum TaskState {
///     Scheduled,
///     InProgress,
///     Completed,
///     Failed,
/// }
///
/// impl State for TaskState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Scheduled => "Scheduled",
///             Self::InProgress => "InProgress",
///             Self::Completed => "Completed",
///             Self::Failed => "Failed",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Completed | Self::Failed)
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Failed)
///     }
/// }
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// This is descriptive only. Whether a state is terminal for an engine
    /// is decided by its transition table: a state with no outgoing rules
    /// rejects every event.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}
