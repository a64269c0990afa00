//! The state machine engine: a pure stepping function over embedded state.

use crate::core::{Command, Event, Lens, State, StateHistory, StateTransition};
use crate::engine::error::{ReplayError, TransitionError};
use crate::engine::handler::{AsyncCommandHandler, CommandHandler};
use crate::table::{BuildError, Rule, TransitionTable};
use chrono::Utc;
use std::fmt;

/// Boxed lens as stored by the engine.
pub type BoxedLens<T, S> = Box<dyn Lens<T, S> + Send + Sync>;

/// Result of applying an event with the handler `H`.
pub type ApplyResult<T, S, Ev, C, H> =
    Result<T, TransitionError<S, Ev, C, <H as CommandHandler<T, C>>::Error>>;

/// Engine that moves entities through their lifecycle.
///
/// The engine owns an immutable transition table, a lens onto the entity's
/// state, and a command handler. It keeps no other state: `apply` takes
/// `&self` and the entity by reference, and returns a replacement entity.
///
/// # Example
///
/// ```rust
/// use lifecycle::engine::StateMachineEngine;
/// use lifecycle::table::{command_rule, simple_rule};
/// use lifecycle::{command_enum, event_enum, field_lens, state_enum};
///
/// state_enum! {
///     enum TaskState {
///         Scheduled,
///         InProgress,
///         Completed,
///     }
/// }
///
/// event_enum! {
///     enum TaskEvent {
///         TaskStarted,
///         TaskCompleted,
///     }
/// }
///
/// command_enum! {
///     enum TaskCommand {
///         Execute,
///     }
/// }
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Task {
///     name: String,
///     state: TaskState,
/// }
///
/// let engine: StateMachineEngine<Task, TaskState, TaskEvent, TaskCommand, _> = StateMachineEngine::from_rules(
///     vec![
///         command_rule(TaskState::Scheduled, TaskEvent::TaskStarted, TaskState::InProgress, TaskCommand::Execute),
///         simple_rule(TaskState::InProgress, TaskEvent::TaskCompleted, TaskState::Completed),
///     ],
///     field_lens!(Task, state),
///     |_: &Task, _: &TaskCommand| -> Result<(), String> { Ok(()) },
/// )
/// .unwrap();
///
/// let task = Task { name: "build-1".to_string(), state: TaskState::Scheduled };
/// let started = engine.apply(&task, &TaskEvent::TaskStarted).unwrap();
///
/// assert_eq!(started.state, TaskState::InProgress);
/// assert!(engine.apply(&task, &TaskEvent::TaskCompleted).is_err());
/// ```
pub struct StateMachineEngine<T, S: State, Ev: Event, C: Command, H> {
    table: TransitionTable<T, S, Ev, C>,
    lens: BoxedLens<T, S>,
    handler: H,
}

impl<T, S: State, Ev: Event, C: Command, H> StateMachineEngine<T, S, Ev, C, H> {
    /// Create an engine from an already validated table.
    pub fn new<L>(table: TransitionTable<T, S, Ev, C>, lens: L, handler: H) -> Self
    where
        L: Lens<T, S> + Send + Sync + 'static,
    {
        Self {
            table,
            lens: Box::new(lens),
            handler,
        }
    }

    /// Create an engine from raw rules, failing fast on duplicate keys.
    pub fn from_rules<I, L>(rules: I, lens: L, handler: H) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = Rule<T, S, Ev, C>>,
        L: Lens<T, S> + Send + Sync + 'static,
    {
        let table = TransitionTable::from_rules(rules)?;
        Ok(Self::new(table, lens, handler))
    }

    pub(crate) fn from_parts(
        table: TransitionTable<T, S, Ev, C>,
        lens: BoxedLens<T, S>,
        handler: H,
    ) -> Self {
        Self {
            table,
            lens,
            handler,
        }
    }

    pub fn table(&self) -> &TransitionTable<T, S, Ev, C> {
        &self.table
    }

    pub fn lens(&self) -> &(dyn Lens<T, S> + Send + Sync) {
        self.lens.as_ref()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Read the entity's current state through the lens (pure).
    pub fn state_of(&self, entity: &T) -> S {
        self.lens.read(entity)
    }

    /// Check whether `event` would be accepted, without running any command.
    ///
    /// A handler failure can still make the real `apply` fail.
    pub fn can_apply(&self, entity: &T, event: &Ev) -> bool {
        let current = self.lens.read(entity);
        self.table
            .lookup(&current, &event.kind())
            .is_some_and(|rule| rule.permits(entity))
    }

    /// Event kinds with a rule from the entity's current state (pure).
    pub fn permitted_events(&self, entity: &T) -> Vec<&Ev::Kind> {
        self.table.events_from(&self.lens.read(entity))
    }

    /// Whether the entity sits in a state with no outgoing rules (pure).
    pub fn is_terminal(&self, entity: &T) -> bool {
        self.table.is_terminal(&self.lens.read(entity))
    }

    /// Select the rule for `event`, checking its guard. No side effects.
    fn select<E>(
        &self,
        entity: &T,
        event: &Ev,
    ) -> Result<(S, &Rule<T, S, Ev, C>), TransitionError<S, Ev, C, E>> {
        let current = self.lens.read(entity);

        let Some(rule) = self.table.lookup(&current, &event.kind()) else {
            return Err(TransitionError::NoSuchTransition {
                current_state: current,
                event: event.clone(),
            });
        };

        if !rule.permits(entity) {
            return Err(TransitionError::GuardRejected {
                current_state: current,
                event: event.clone(),
            });
        }

        Ok((current, rule))
    }

    fn record(from: S, rule: &Rule<T, S, Ev, C>, event: &Ev) -> StateTransition<S> {
        StateTransition {
            from,
            to: rule.to.clone(),
            event: event.name().to_string(),
            command: rule.command.as_ref().map(|c| c.name().to_string()),
            timestamp: Utc::now(),
        }
    }

    /// Write the rule's destination into a new entity.
    fn commit(&self, entity: &T, rule: &Rule<T, S, Ev, C>) -> T {
        self.lens.write(entity, rule.to.clone())
    }

    /// A fresh snapshot equal to `entity`, built through the lens.
    fn snapshot(&self, entity: &T) -> T {
        self.lens.write(entity, self.lens.read(entity))
    }

    fn command_failed<E>(command: &C, cause: E) -> TransitionError<S, Ev, C, E> {
        TransitionError::CommandFailed {
            command: command.clone(),
            cause,
        }
    }
}

impl<T, S, Ev, C, H> StateMachineEngine<T, S, Ev, C, H>
where
    S: State,
    Ev: Event,
    C: Command,
    H: CommandHandler<T, C>,
{
    /// Apply `event` to `entity`.
    ///
    /// Looks up the rule for the entity's current state and the event's kind,
    /// checks its guard, runs its command (if any) exactly once, and on
    /// success returns the entity with its state replaced by the rule's
    /// destination. On any failure the original entity is untouched and no
    /// updated entity is produced.
    pub fn apply(&self, entity: &T, event: &Ev) -> ApplyResult<T, S, Ev, C, H> {
        self.step(entity, event).map(|(_, _, next)| next)
    }

    /// Apply `event` and also return a record of the committed transition.
    pub fn apply_traced(
        &self,
        entity: &T,
        event: &Ev,
    ) -> Result<(T, StateTransition<S>), TransitionError<S, Ev, C, H::Error>> {
        let (current, rule, next) = self.step(entity, event)?;
        Ok((next, Self::record(current, rule, event)))
    }

    fn step(
        &self,
        entity: &T,
        event: &Ev,
    ) -> Result<(S, &Rule<T, S, Ev, C>, T), TransitionError<S, Ev, C, H::Error>> {
        let (current, rule) = self.select::<H::Error>(entity, event)?;

        if let Some(command) = &rule.command {
            self.handler
                .handle(entity, command)
                .map_err(|cause| Self::command_failed(command, cause))?;
        }

        Ok((current, rule, self.commit(entity, rule)))
    }

    /// Apply a sequence of events in order, stopping at the first failure.
    ///
    /// On success returns the final entity and the history of every
    /// committed step. On failure the [`ReplayError`] carries the failing
    /// index together with the entity and history of the steps that did
    /// commit, so their commands never need to run again.
    pub fn apply_all<'a, I>(
        &self,
        entity: &T,
        events: I,
    ) -> Result<(T, StateHistory<S>), ReplayError<T, S, Ev, C, H::Error>>
    where
        I: IntoIterator<Item = &'a Ev>,
        Ev: 'a,
    {
        let mut history = StateHistory::new();
        let mut current: Option<T> = None;

        for (index, event) in events.into_iter().enumerate() {
            let from = current.as_ref().unwrap_or(entity);
            match self.apply_traced(from, event) {
                Ok((next, transition)) => {
                    history = history.record(transition);
                    current = Some(next);
                }
                Err(error) => {
                    let last = match current {
                        Some(last) => last,
                        None => self.snapshot(entity),
                    };
                    return Err(ReplayError {
                        index,
                        applied: history.len(),
                        last,
                        history,
                        error,
                    });
                }
            }
        }

        match current {
            Some(last) => Ok((last, history)),
            None => Ok((self.snapshot(entity), history)),
        }
    }
}

impl<T, S, Ev, C, H> StateMachineEngine<T, S, Ev, C, H>
where
    T: Send + Sync,
    S: State,
    Ev: Event,
    C: Command,
    H: AsyncCommandHandler<T, C>,
{
    /// Apply `event`, awaiting an asynchronous handler before committing.
    ///
    /// Same semantics as [`apply`](Self::apply). No timeout is imposed;
    /// wrap the returned future to bound it.
    pub async fn apply_async(
        &self,
        entity: &T,
        event: &Ev,
    ) -> Result<T, TransitionError<S, Ev, C, H::Error>> {
        let (_, rule) = self.select::<H::Error>(entity, event)?;

        if let Some(command) = &rule.command {
            self.handler
                .handle(entity, command)
                .await
                .map_err(|cause| Self::command_failed(command, cause))?;
        }

        Ok(self.commit(entity, rule))
    }
}

impl<T, S: State, Ev: Event, C: Command, H> fmt::Debug for StateMachineEngine<T, S, Ev, C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachineEngine")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
