//! Build errors for rules, tables, and engines.

use thiserror::Error;

/// Errors that can occur when building rules, transition tables, and engines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Duplicate rule for state '{state}' on event '{event}'. Each (state, event) pair may have at most one rule")]
    DuplicateRule { state: String, event: String },

    #[error("Rule source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Rule trigger not specified. Call .on(event_kind)")]
    MissingEvent,

    #[error("Rule target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Lens not specified. Call .lens(lens) before .build()")]
    MissingLens,

    #[error("Command handler not specified. Call .handler(handler) before .build()")]
    MissingHandler,
}
