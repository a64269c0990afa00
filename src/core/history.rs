//! Transition history tracking.
//!
//! Records of committed transitions, kept as immutable values. The engine
//! produces them from [`apply_traced`](crate::engine::StateMachineEngine::apply_traced)
//! and [`apply_all`](crate::engine::StateMachineEngine::apply_all); storing
//! them is up to the caller.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use lifecycle::core::StateTransition;
/// use lifecycle::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum TaskState {
///         Scheduled,
///         InProgress,
///     }
/// }
///
/// let transition = StateTransition {
///     from: TaskState::Scheduled,
///     to: TaskState::InProgress,
///     event: "TaskStarted".to_string(),
///     command: Some("Execute".to_string()),
///     timestamp: Utc::now(),
/// };
///
/// assert!(!transition.is_self_loop());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Name of the event that triggered the transition
    pub event: String,
    /// Name of the command executed before committing, if any
    pub command: Option<String>,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

impl<S: State> StateTransition<S> {
    /// Whether the transition left the entity in the state it started in.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Ordered history of committed transitions.
///
/// History is immutable - `record` returns a new history with the transition
/// appended.
///
/// # Example
///
/// ```rust
/// use lifecycle::core::{StateHistory, StateTransition};
/// use lifecycle::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Step {
///         Start,
///         Middle,
///         End,
///     }
/// }
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: Step::Start,
///         to: Step::Middle,
///         event: "Advance".to_string(),
///         command: None,
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         from: Step::Middle,
///         to: Step::End,
///         event: "Advance".to_string(),
///         command: None,
///         timestamp: Utc::now(),
///     });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&Step::Start, &Step::Middle, &Step::End]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the initial state followed by the `to` state of each
    /// transition, in order.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Calculate total duration from first to last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all transitions in order.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    /// The most recent transition.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }

    /// The state reached by the most recent transition.
    pub fn current(&self) -> Option<&S> {
        self.last().map(|t| &t.to)
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
