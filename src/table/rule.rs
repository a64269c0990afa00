//! Transition rules and their builder.

use crate::core::{Command, Event, Guard, State};
use crate::table::error::BuildError;
use std::fmt;

/// One entry of a transition table.
///
/// When an entity in state `from` receives an event of kind `on`, the entity
/// moves to `to`, provided the optional guard accepts it and the optional
/// command succeeds.
pub struct Rule<T, S: State, Ev: Event, C: Command> {
    pub from: S,
    pub on: Ev::Kind,
    pub to: S,
    pub command: Option<C>,
    pub guard: Option<Guard<T>>,
}

impl<T, S: State, Ev: Event, C: Command> Rule<T, S, Ev, C> {
    /// Create an unguarded rule without a command.
    pub fn new(from: S, on: Ev::Kind, to: S) -> Self {
        Self {
            from,
            on,
            to,
            command: None,
            guard: None,
        }
    }

    /// Attach a command to run before the transition commits.
    pub fn with_command(mut self, command: C) -> Self {
        self.command = Some(command);
        self
    }

    /// Attach a guard predicate.
    pub fn with_guard(mut self, guard: Guard<T>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Whether the guard (if any) accepts this entity (pure).
    pub fn permits(&self, entity: &T) -> bool {
        self.guard.as_ref().map_or(true, |g| g.check(entity))
    }

    /// The table key this rule occupies.
    pub fn key(&self) -> (S, Ev::Kind) {
        (self.from.clone(), self.on.clone())
    }
}

impl<T, S: State, Ev: Event, C: Command> Clone for Rule<T, S, Ev, C> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            on: self.on.clone(),
            to: self.to.clone(),
            command: self.command.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<T, S: State, Ev: Event, C: Command> fmt::Debug for Rule<T, S, Ev, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("from", &self.from)
            .field("on", &self.on)
            .field("to", &self.to)
            .field("command", &self.command)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

/// Builder for constructing rules with a fluent API.
pub struct RuleBuilder<T, S: State, Ev: Event, C: Command> {
    from: Option<S>,
    on: Option<Ev::Kind>,
    to: Option<S>,
    command: Option<C>,
    guard: Option<Guard<T>>,
}

impl<T, S: State, Ev: Event, C: Command> RuleBuilder<T, S, Ev, C> {
    /// Create a new rule builder.
    pub fn new() -> Self {
        Self {
            from: None,
            on: None,
            to: None,
            command: None,
            guard: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the triggering event kind (required).
    pub fn on(mut self, kind: Ev::Kind) -> Self {
        self.on = Some(kind);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Set the command to run before committing (optional).
    pub fn command(mut self, command: C) -> Self {
        self.command = Some(command);
        self
    }

    /// Add a guard predicate (optional).
    pub fn guard(mut self, guard: Guard<T>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Build the rule.
    pub fn build(self) -> Result<Rule<T, S, Ev, C>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let on = self.on.ok_or(BuildError::MissingEvent)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        Ok(Rule {
            from,
            on,
            to,
            command: self.command,
            guard: self.guard,
        })
    }
}

impl<T, S: State, Ev: Event, C: Command> Default for RuleBuilder<T, S, Ev, C> {
    fn default() -> Self {
        Self::new()
    }
}
