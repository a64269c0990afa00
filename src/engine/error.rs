//! Errors returned by the engine when applying events.

use crate::core::{Command, Event, State, StateHistory};
use thiserror::Error;

/// Errors that can occur when applying an event to an entity.
///
/// Every variant is reported to the immediate caller; the engine never
/// retries and never returns a partially updated entity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError<S: State, Ev: Event, C: Command, E> {
    /// The table has no rule for the entity's state and the event's kind.
    #[error("No transition from state '{}' on event '{}'", .current_state.name(), .event.name())]
    NoSuchTransition { current_state: S, event: Ev },

    /// A rule matched but its guard rejected the entity.
    #[error("Guard rejected event '{}' in state '{}'", .event.name(), .current_state.name())]
    GuardRejected { current_state: S, event: Ev },

    /// The command handler failed; the transition was not committed.
    #[error("Command '{}' failed: {cause:?}", .command.name())]
    CommandFailed { command: C, cause: E },
}

impl<S: State, Ev: Event, C: Command, E> TransitionError<S, Ev, C, E> {
    pub fn is_no_such_transition(&self) -> bool {
        matches!(self, Self::NoSuchTransition { .. })
    }

    pub fn is_guard_rejected(&self) -> bool {
        matches!(self, Self::GuardRejected { .. })
    }

    pub fn is_command_failed(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }

    /// The handler's failure payload, if this is a command failure.
    pub fn cause(&self) -> Option<&E> {
        match self {
            Self::CommandFailed { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// Take the handler's failure payload, if this is a command failure.
    pub fn into_cause(self) -> Option<E> {
        match self {
            Self::CommandFailed { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// A failure while folding a sequence of events.
///
/// Steps before `index` were committed and their commands have run. The
/// entity they produced and their history travel with the error, so a caller
/// can resume from `last` without executing those commands again.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Event #{index} failed after {applied} applied transitions: {error}")]
pub struct ReplayError<T, S: State, Ev: Event, C: Command, E> {
    /// Position of the failing event in the input sequence.
    pub index: usize,
    /// Number of transitions committed before the failure.
    pub applied: usize,
    /// Entity after the last committed step (the input if none committed).
    pub last: T,
    /// Transitions committed before the failure.
    pub history: StateHistory<S>,
    pub error: TransitionError<S, Ev, C, E>,
}

impl<T, S: State, Ev: Event, C: Command, E> ReplayError<T, S, Ev, C, E> {
    /// Split into the committed prefix and the failure that stopped it.
    pub fn into_parts(self) -> (T, StateHistory<S>, TransitionError<S, Ev, C, E>) {
        (self.last, self.history, self.error)
    }
}
