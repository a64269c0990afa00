//! Builder for constructing engines.

use crate::core::{Command, Event, Lens, State};
use crate::engine::machine::{BoxedLens, StateMachineEngine};
use crate::table::{BuildError, Rule, RuleBuilder, TransitionTable};

/// Builder for constructing engines with a fluent API.
///
/// Rules are validated as a whole in [`build`](Self::build), so a duplicate
/// `(state, event)` key is reported before the engine ever sees an entity.
pub struct EngineBuilder<T, S: State, Ev: Event, C: Command, H> {
    rules: Vec<Rule<T, S, Ev, C>>,
    lens: Option<BoxedLens<T, S>>,
    handler: Option<H>,
}

impl<T, S: State, Ev: Event, C: Command, H> EngineBuilder<T, S, Ev, C, H> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            lens: None,
            handler: None,
        }
    }

    /// Add a rule using a builder.
    /// Returns an error if the builder fails validation.
    pub fn rule(mut self, builder: RuleBuilder<T, S, Ev, C>) -> Result<Self, BuildError> {
        self.rules.push(builder.build()?);
        Ok(self)
    }

    /// Add a pre-built rule.
    pub fn add_rule(mut self, rule: Rule<T, S, Ev, C>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add multiple rules at once.
    pub fn rules(mut self, rules: Vec<Rule<T, S, Ev, C>>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Set the lens onto the entity's state (required).
    pub fn lens<L>(mut self, lens: L) -> Self
    where
        L: Lens<T, S> + Send + Sync + 'static,
    {
        self.lens = Some(Box::new(lens));
        self
    }

    /// Set the command handler (required).
    pub fn handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Build the engine.
    /// Returns an error if the lens or handler is missing or rules collide.
    pub fn build(self) -> Result<StateMachineEngine<T, S, Ev, C, H>, BuildError> {
        let lens = self.lens.ok_or(BuildError::MissingLens)?;
        let handler = self.handler.ok_or(BuildError::MissingHandler)?;
        let table = TransitionTable::from_rules(self.rules)?;

        Ok(StateMachineEngine::from_parts(table, lens, handler))
    }
}

impl<T, S: State, Ev: Event, C: Command, H> Default for EngineBuilder<T, S, Ev, C, H> {
    fn default() -> Self {
        Self::new()
    }
}
