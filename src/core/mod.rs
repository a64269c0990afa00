//! Core lifecycle types.
//!
//! This module contains the pure vocabulary the engine is generic over:
//! - States, events, and commands via the `State`, `Event`, and `Command` traits
//! - Lenses that isolate the engine from entity layout
//! - Guard predicates for gating rules
//! - Immutable history tracking
//!
//! Nothing in this module performs side effects.

mod command;
mod event;
mod guard;
mod history;
mod lens;
mod state;

pub use command::Command;
pub use event::Event;
pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use lens::{FnLens, Lens};
pub use state::State;
