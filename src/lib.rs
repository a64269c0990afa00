//! Lifecycle: a generic, typed state machine engine for entity lifecycles
//!
//! Entities carry their own state. The engine reads that state through a
//! lens, looks up the rule for the incoming event in an immutable transition
//! table, asks a caller-supplied handler to run the rule's command, and hands
//! back a new entity in the destination state. It keeps no state of its own.
//!
//! # Core Concepts
//!
//! - **State / Event / Command**: closed enumerations described by traits
//! - **Lens**: read/write access to the state field of any entity shape
//! - **Transition table**: unique `(state, event)` keys validated at construction
//! - **Handler**: the imperative shell that executes commands and may fail
//!
//! # Example
//!
//! ```rust
//! use lifecycle::engine::{StateMachineEngine, TransitionError};
//! use lifecycle::table::{command_rule, simple_rule};
//! use lifecycle::{command_enum, event_enum, field_lens, state_enum};
//!
//! state_enum! {
//!     enum TaskState {
//!         Scheduled,
//!         InProgress,
//!         Completed,
//!         Failed,
//!     }
//!     final: [Completed, Failed]
//!     error: [Failed]
//! }
//!
//! event_enum! {
//!     enum TaskEvent {
//!         TaskScheduled,
//!         TaskStarted,
//!         TaskFailed,
//!         TaskCompleted,
//!     }
//! }
//!
//! command_enum! {
//!     enum TaskCommand {
//!         Execute,
//!     }
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Task {
//!     name: String,
//!     state: TaskState,
//! }
//!
//! let engine: StateMachineEngine<Task, TaskState, TaskEvent, TaskCommand, _> =
//!     StateMachineEngine::from_rules(
//!         vec![
//!             command_rule(
//!                 TaskState::Scheduled,
//!                 TaskEvent::TaskStarted,
//!                 TaskState::InProgress,
//!                 TaskCommand::Execute,
//!             ),
//!             simple_rule(TaskState::InProgress, TaskEvent::TaskCompleted, TaskState::Completed),
//!             simple_rule(TaskState::InProgress, TaskEvent::TaskFailed, TaskState::Failed),
//!         ],
//!         field_lens!(Task, state),
//!         |_: &Task, _: &TaskCommand| -> Result<(), String> { Ok(()) },
//!     )
//!     .unwrap();
//!
//! let task = Task { name: "build-1".to_string(), state: TaskState::Scheduled };
//!
//! let started = engine.apply(&task, &TaskEvent::TaskStarted).unwrap();
//! assert_eq!(started.state, TaskState::InProgress);
//!
//! let rejected = engine.apply(&task, &TaskEvent::TaskCompleted);
//! assert!(matches!(rejected, Err(TransitionError::NoSuchTransition { .. })));
//! ```

pub mod checkpoint;
pub mod core;
pub mod engine;
pub mod table;

// Re-export commonly used types
pub use crate::checkpoint::{Checkpoint, CheckpointError};
pub use crate::core::{Command, Event, FnLens, Guard, Lens, State, StateHistory, StateTransition};
pub use crate::engine::{
    AsyncCommandHandler, CommandHandler, EngineBuilder, StateMachineEngine, TransitionError,
};
pub use crate::table::{BuildError, Rule, RuleBuilder, TransitionTable};
