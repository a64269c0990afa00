//! The immutable transition table and its builder.

use crate::core::{Command, Event, State};
use crate::table::error::BuildError;
use crate::table::rule::{Rule, RuleBuilder};
use std::collections::HashMap;
use std::fmt;

/// Immutable mapping from `(state, event kind)` to a [`Rule`].
///
/// Every key holds at most one rule; tables containing duplicates cannot be
/// constructed. Rules keep the order they were supplied in for iteration.
///
/// # Example
///
/// ```rust
/// use lifecycle::table::{simple_rule, TransitionTable};
/// use lifecycle::{command_enum, event_enum, state_enum};
///
/// state_enum! {
///     enum Light {
///         Red,
///         Green,
///     }
/// }
///
/// event_enum! {
///     enum Tick {
///         Next,
///     }
/// }
///
/// command_enum! {
///     enum NoCommand {
///         Nothing,
///     }
/// }
///
/// let table = TransitionTable::<(), Light, Tick, NoCommand>::from_rules(vec![
///     simple_rule(Light::Red, Tick::Next, Light::Green),
///     simple_rule(Light::Green, Tick::Next, Light::Red),
/// ])
/// .unwrap();
///
/// assert_eq!(table.lookup(&Light::Red, &Tick::Next).map(|r| &r.to), Some(&Light::Green));
/// ```
pub struct TransitionTable<T, S: State, Ev: Event, C: Command> {
    rules: Vec<Rule<T, S, Ev, C>>,
    index: HashMap<(S, Ev::Kind), usize>,
}

impl<T, S: State, Ev: Event, C: Command> TransitionTable<T, S, Ev, C> {
    /// Create a table that accepts no events at all.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Start a fluent table builder.
    pub fn builder() -> TableBuilder<T, S, Ev, C> {
        TableBuilder::new()
    }

    /// Build a table from rules, rejecting the first duplicate key.
    pub fn from_rules<I>(rules: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = Rule<T, S, Ev, C>>,
    {
        let mut table = Self::empty();
        for rule in rules {
            let key = rule.key();
            if table.index.contains_key(&key) {
                return Err(BuildError::DuplicateRule {
                    state: key.0.name().to_string(),
                    event: Ev::kind_name(&key.1),
                });
            }
            table.index.insert(key, table.rules.len());
            table.rules.push(rule);
        }
        Ok(table)
    }

    /// Find the rule for a `(state, event kind)` pair.
    pub fn lookup(&self, state: &S, kind: &Ev::Kind) -> Option<&Rule<T, S, Ev, C>> {
        // HashMap<(S, K), _> cannot be probed with (&S, &K), so the key is cloned.
        self.index
            .get(&(state.clone(), kind.clone()))
            .and_then(|&i| self.rules.get(i))
    }

    /// All rules leaving `state`, in declaration order.
    pub fn rules_from(&self, state: &S) -> impl Iterator<Item = &Rule<T, S, Ev, C>> + '_ {
        let state = state.clone();
        self.rules.iter().filter(move |r| r.from == state)
    }

    /// Event kinds accepted from `state`, in declaration order.
    pub fn events_from(&self, state: &S) -> Vec<&Ev::Kind> {
        self.rules_from(state).map(|r| &r.on).collect()
    }

    /// A state is terminal when no rule leaves it.
    pub fn is_terminal(&self, state: &S) -> bool {
        self.rules_from(state).next().is_none()
    }

    /// Every state mentioned by some rule, as source or target, without repeats.
    pub fn states(&self) -> Vec<&S> {
        let mut states: Vec<&S> = Vec::new();
        for rule in &self.rules {
            for state in [&rule.from, &rule.to] {
                if !states.contains(&state) {
                    states.push(state);
                }
            }
        }
        states
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule<T, S, Ev, C>> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T, S: State, Ev: Event, C: Command> Clone for TransitionTable<T, S, Ev, C> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            index: self.index.clone(),
        }
    }
}

impl<T, S: State, Ev: Event, C: Command> fmt::Debug for TransitionTable<T, S, Ev, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.iter()).finish()
    }
}

/// Builder for collecting rules before validating them into a table.
pub struct TableBuilder<T, S: State, Ev: Event, C: Command> {
    rules: Vec<Rule<T, S, Ev, C>>,
}

impl<T, S: State, Ev: Event, C: Command> TableBuilder<T, S, Ev, C> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
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

    /// Validate the collected rules into a table.
    pub fn build(self) -> Result<TransitionTable<T, S, Ev, C>, BuildError> {
        TransitionTable::from_rules(self.rules)
    }
}

impl<T, S: State, Ev: Event, C: Command> Default for TableBuilder<T, S, Ev, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{command_rule, simple_rule};
    use crate::{command_enum, event_enum, state_enum};

    state_enum! {
        enum TaskState {
            Scheduled,
            InProgress,
            Completed,
            Failed,
        }
        final: [Completed, Failed]
        error: [Failed]
    }

    event_enum! {
        enum TaskEvent {
            TaskScheduled,
            TaskStarted,
            TaskFailed,
            TaskCompleted,
        }
    }

    command_enum! {
        enum TaskCommand {
            Execute,
        }
    }

    type TaskTable = TransitionTable<(), TaskState, TaskEvent, TaskCommand>;

    fn task_rules() -> Vec<Rule<(), TaskState, TaskEvent, TaskCommand>> {
        vec![
            simple_rule(
                TaskState::Scheduled,
                TaskEvent::TaskScheduled,
                TaskState::Scheduled,
            ),
            command_rule(
                TaskState::Scheduled,
                TaskEvent::TaskStarted,
                TaskState::InProgress,
                TaskCommand::Execute,
            ),
            simple_rule(
                TaskState::InProgress,
                TaskEvent::TaskCompleted,
                TaskState::Completed,
            ),
            simple_rule(
                TaskState::InProgress,
                TaskEvent::TaskFailed,
                TaskState::Failed,
            ),
        ]
    }

    #[test]
    fn lookup_finds_declared_rules() {
        let table = TaskTable::from_rules(task_rules()).unwrap();

        let rule = table
            .lookup(&TaskState::Scheduled, &TaskEvent::TaskStarted)
            .unwrap();
        assert_eq!(rule.to, TaskState::InProgress);
        assert_eq!(rule.command, Some(TaskCommand::Execute));

        assert!(table
            .lookup(&TaskState::Scheduled, &TaskEvent::TaskCompleted)
            .is_none());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut rules = task_rules();
        rules.push(simple_rule(
            TaskState::InProgress,
            TaskEvent::TaskFailed,
            TaskState::Scheduled,
        ));

        let result = TaskTable::from_rules(rules);

        assert_eq!(
            result.unwrap_err(),
            BuildError::DuplicateRule {
                state: "InProgress".to_string(),
                event: "TaskFailed".to_string(),
            }
        );
    }

    #[derive(Clone, Debug)]
    enum Upload {
        Received { bytes: u64 },
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    struct UploadKind(u8);

    impl Event for Upload {
        type Kind = UploadKind;

        fn kind(&self) -> UploadKind {
            UploadKind(0)
        }

        fn name(&self) -> &str {
            "Received"
        }

        fn kind_name(kind: &UploadKind) -> String {
            match kind.0 {
                0 => "Received".to_string(),
                n => format!("unknown-{}", n),
            }
        }
    }

    #[test]
    fn duplicate_rule_names_kind_like_the_event() {
        let received = Upload::Received { bytes: 512 };
        let rules: Vec<Rule<(), TaskState, Upload, TaskCommand>> = vec![
            simple_rule(TaskState::Scheduled, received.kind(), TaskState::InProgress),
            simple_rule(TaskState::Scheduled, UploadKind(0), TaskState::Failed),
        ];

        let error = TransitionTable::from_rules(rules).unwrap_err();

        assert_eq!(
            error,
            BuildError::DuplicateRule {
                state: "Scheduled".to_string(),
                event: received.name().to_string(),
            }
        );
        let Upload::Received { bytes } = received;
        assert!(!error.to_string().contains(&bytes.to_string()));
    }

    #[test]
    fn same_event_from_different_states_is_allowed() {
        let table = TaskTable::from_rules(vec![
            simple_rule(
                TaskState::Scheduled,
                TaskEvent::TaskFailed,
                TaskState::Failed,
            ),
            simple_rule(
                TaskState::InProgress,
                TaskEvent::TaskFailed,
                TaskState::Failed,
            ),
        ]);

        assert_eq!(table.unwrap().len(), 2);
    }

    #[test]
    fn terminal_states_have_no_outgoing_rules() {
        let table = TaskTable::from_rules(task_rules()).unwrap();

        assert!(!table.is_terminal(&TaskState::Scheduled));
        assert!(!table.is_terminal(&TaskState::InProgress));
        assert!(table.is_terminal(&TaskState::Completed));
        assert!(table.is_terminal(&TaskState::Failed));
    }

    #[test]
    fn events_from_lists_declared_order() {
        let table = TaskTable::from_rules(task_rules()).unwrap();

        assert_eq!(
            table.events_from(&TaskState::InProgress),
            vec![&TaskEvent::TaskCompleted, &TaskEvent::TaskFailed]
        );
        assert!(table.events_from(&TaskState::Completed).is_empty());
    }

    #[test]
    fn states_are_collected_once() {
        let table = TaskTable::from_rules(task_rules()).unwrap();

        assert_eq!(
            table.states(),
            vec![
                &TaskState::Scheduled,
                &TaskState::InProgress,
                &TaskState::Completed,
                &TaskState::Failed,
            ]
        );
    }

    #[test]
    fn builder_collects_and_validates() {
        let table = TaskTable::builder()
            .rule(
                RuleBuilder::new()
                    .from(TaskState::Scheduled)
                    .on(TaskEvent::TaskStarted)
                    .to(TaskState::InProgress)
                    .command(TaskCommand::Execute),
            )
            .unwrap()
            .rules(task_rules().split_off(2))
            .build()
            .unwrap();

        assert_eq!(table.len(), 3);
    }

    #[test]
    fn builder_surfaces_rule_errors() {
        let result = TaskTable::builder().rule(RuleBuilder::new().from(TaskState::Scheduled));

        assert!(matches!(result, Err(BuildError::MissingEvent)));
    }

    #[test]
    fn builder_rejects_duplicates_on_build() {
        let rule = simple_rule(
            TaskState::InProgress,
            TaskEvent::TaskCompleted,
            TaskState::Completed,
        );

        let result = TaskTable::builder()
            .add_rule(rule.clone())
            .add_rule(rule)
            .build();

        assert!(matches!(result, Err(BuildError::DuplicateRule { .. })));
    }

    #[test]
    fn empty_table_accepts_nothing() {
        let table = TaskTable::empty();

        assert!(table.is_empty());
        assert!(table.is_terminal(&TaskState::Scheduled));
    }
}
