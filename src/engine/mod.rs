//! The lifecycle engine and the imperative shell around it.
//!
//! # Key Concepts
//!
//! - **Engine**: a stateless stepping function over the entity's embedded state
//! - **Handlers**: caller-supplied executors for the commands rules request
//! - **Errors**: typed failures returned to the immediate caller, never retried
//!
//! The engine itself performs no I/O and no logging. Wrap a handler in
//! [`Traced`] to observe dispatched commands through `tracing`.

mod builder;
mod error;
mod handler;
mod machine;

pub use builder::EngineBuilder;
pub use error::{ReplayError, TransitionError};
pub use handler::{AsyncCommandHandler, CommandHandler, NoopHandler, Traced};
pub use machine::{ApplyResult, BoxedLens, StateMachineEngine};
