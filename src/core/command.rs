//! Commands requested by transition rules.

use std::fmt::Debug;

/// A side-effecting action a rule asks the command handler to perform.
///
/// Commands are requests, not facts: the handler may refuse or fail, in which
/// case the transition that requested the command is not committed.
pub trait Command: Clone + Debug + Send + Sync {
    /// Get the command's name for display/logging.
    fn name(&self) -> &str;
}
