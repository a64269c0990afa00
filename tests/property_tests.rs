//! Property-based tests for the lifecycle engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated entities, tables, and event sequences.

use chrono::Utc;
use lifecycle::core::{Lens, State, StateHistory, StateTransition};
use lifecycle::engine::{CommandHandler, StateMachineEngine};
use lifecycle::table::{command_rule, simple_rule, BuildError, Rule, TransitionTable};
use lifecycle::{command_enum, event_enum, field_lens, state_enum};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

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

#[derive(Clone, Debug, PartialEq)]
struct Task {
    name: String,
    priority: u8,
    state: TaskState,
}

type TaskRule = Rule<Task, TaskState, TaskEvent, TaskCommand>;

/// Counts every command it is asked to run; fails all of them when `fail` is set.
#[derive(Default)]
struct Counter {
    calls: AtomicUsize,
    fail: bool,
}

impl CommandHandler<Task, TaskCommand> for Counter {
    type Error = String;

    fn handle(&self, task: &Task, _command: &TaskCommand) -> Result<(), String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(format!("{} was not executed", task.name))
        } else {
            Ok(())
        }
    }
}

fn task_rules() -> Vec<TaskRule> {
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

fn engine(handler: Counter) -> StateMachineEngine<Task, TaskState, TaskEvent, TaskCommand, Counter> {
    StateMachineEngine::from_rules(task_rules(), field_lens!(Task, state), handler).unwrap()
}

prop_compose! {
    fn arbitrary_state()(variant in 0..4u8) -> TaskState {
        match variant {
            0 => TaskState::Scheduled,
            1 => TaskState::InProgress,
            2 => TaskState::Completed,
            _ => TaskState::Failed,
        }
    }
}

prop_compose! {
    fn arbitrary_event()(variant in 0..4u8) -> TaskEvent {
        match variant {
            0 => TaskEvent::TaskScheduled,
            1 => TaskEvent::TaskStarted,
            2 => TaskEvent::TaskFailed,
            _ => TaskEvent::TaskCompleted,
        }
    }
}

prop_compose! {
    fn arbitrary_task()(
        name in "[a-z]{1,8}-[0-9]{1,3}",
        priority in any::<u8>(),
        state in arbitrary_state(),
    ) -> Task {
        Task { name, priority, state }
    }
}

proptest! {
    #[test]
    fn lens_reads_what_it_wrote(task in arbitrary_task(), state in arbitrary_state()) {
        let lens = field_lens!(Task, state);

        let written = lens.write(&task, state);

        prop_assert_eq!(lens.read(&written), state);
    }

    #[test]
    fn lens_write_keeps_other_fields(task in arbitrary_task(), state in arbitrary_state()) {
        let lens = field_lens!(Task, state);

        let written = lens.write(&task, state);

        prop_assert_eq!(&written.name, &task.name);
        prop_assert_eq!(written.priority, task.priority);
    }

    #[test]
    fn writing_current_state_is_identity(task in arbitrary_task()) {
        let lens = field_lens!(Task, state);

        let written = lens.write(&task, lens.read(&task));

        prop_assert_eq!(written, task);
    }

    #[test]
    fn apply_is_deterministic(task in arbitrary_task(), event in arbitrary_event()) {
        let engine = engine(Counter::default());

        let first = engine.apply(&task, &event);
        let second = engine.apply(&task, &event);

        prop_assert_eq!(first, second);
    }

    #[test]
    fn unmatched_events_fail_closed(task in arbitrary_task(), event in arbitrary_event()) {
        let engine = engine(Counter::default());
        prop_assume!(engine.table().lookup(&task.state, &event).is_none());

        let result = engine.apply(&task, &event);

        prop_assert!(result.unwrap_err().is_no_such_transition());
        prop_assert_eq!(engine.handler().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn success_moves_to_rule_destination(task in arbitrary_task(), event in arbitrary_event()) {
        let engine = engine(Counter::default());
        let destination = engine.table().lookup(&task.state, &event).map(|rule| rule.to);
        prop_assume!(destination.is_some());

        let next = engine.apply(&task, &event).unwrap();

        prop_assert_eq!(Some(next.state), destination);
        prop_assert_eq!(&next.name, &task.name);
        prop_assert_eq!(next.priority, task.priority);
    }

    #[test]
    fn failed_commands_never_commit(task in arbitrary_task(), event in arbitrary_event()) {
        let engine = engine(Counter { fail: true, ..Counter::default() });
        let original = task.clone();

        match engine.apply(&task, &event) {
            Ok(next) => {
                // Only rules without a command can succeed here.
                let rule = engine.table().lookup(&task.state, &event).unwrap();
                prop_assert!(rule.command.is_none());
                prop_assert_eq!(next.state, rule.to);
            }
            Err(error) => {
                prop_assert!(error.is_no_such_transition() || error.is_command_failed());
            }
        }
        prop_assert_eq!(task, original);
    }

    #[test]
    fn commands_run_once_per_committed_transition(
        events in prop::collection::vec(arbitrary_event(), 0..12)
    ) {
        let engine = engine(Counter::default());
        let mut task = Task { name: "build-1".to_string(), priority: 1, state: TaskState::Scheduled };
        let mut expected_calls = 0;

        for event in &events {
            let has_command = engine
                .table()
                .lookup(&task.state, event)
                .is_some_and(|rule| rule.command.is_some());
            if let Ok(next) = engine.apply(&task, event) {
                if has_command {
                    expected_calls += 1;
                }
                task = next;
            }
        }

        prop_assert_eq!(engine.handler().calls.load(Ordering::SeqCst), expected_calls);
    }

    #[test]
    fn duplicate_keys_are_rejected(
        triples in prop::collection::vec(
            (arbitrary_state(), arbitrary_event(), arbitrary_state()),
            0..10,
        )
    ) {
        let mut seen = HashSet::new();
        let has_duplicate = !triples.iter().all(|(from, on, _)| seen.insert((*from, *on)));
        let rules: Vec<TaskRule> = triples
            .iter()
            .map(|(from, on, to)| simple_rule(*from, *on, *to))
            .collect();

        let result = TransitionTable::from_rules(rules);

        if has_duplicate {
            let rejected = matches!(result, Err(BuildError::DuplicateRule { .. }));
            prop_assert!(rejected);
        } else {
            prop_assert_eq!(result.unwrap().len(), triples.len());
        }
    }

    #[test]
    fn replay_history_is_a_connected_path(
        events in prop::collection::vec(arbitrary_event(), 0..8)
    ) {
        let engine = engine(Counter::default());
        let start = Task { name: "build-1".to_string(), priority: 3, state: TaskState::Scheduled };

        match engine.apply_all(&start, &events) {
            Ok((last, history)) => {
                prop_assert_eq!(history.len(), events.len());
                let transitions = history.transitions();
                for pair in transitions.windows(2) {
                    prop_assert_eq!(pair[0].to, pair[1].from);
                }
                if let Some(first) = transitions.first() {
                    prop_assert_eq!(first.from, TaskState::Scheduled);
                }
                prop_assert_eq!(history.current().copied().unwrap_or(start.state), last.state);
            }
            Err(error) => {
                prop_assert!(error.index < events.len());
                prop_assert_eq!(error.applied, error.index);
                prop_assert_eq!(error.history.len(), error.applied);
                prop_assert_eq!(
                    error.history.current().copied().unwrap_or(start.state),
                    error.last.state
                );
                let replayed = engine.apply_all(&start, &events[..error.index]);
                prop_assert_eq!(replayed.ok().map(|(last, _)| last), Some(error.last));
            }
        }
    }

    #[test]
    fn terminal_states_have_no_permitted_events(task in arbitrary_task()) {
        let engine = engine(Counter::default());

        let terminal = engine.is_terminal(&task);

        prop_assert_eq!(terminal, engine.permitted_events(&task).is_empty());
        prop_assert_eq!(terminal, task.state.is_final());
    }

    #[test]
    fn history_record_is_pure(from in arbitrary_state(), to in arbitrary_state()) {
        let history = StateHistory::new();

        let next = history.record(StateTransition {
            from,
            to,
            event: "TaskStarted".to_string(),
            command: None,
            timestamp: Utc::now(),
        });

        prop_assert!(history.is_empty());
        prop_assert_eq!(next.len(), 1);
        prop_assert_eq!(next.current(), Some(&to));
    }

    #[test]
    fn state_roundtrip_serialization(state in arbitrary_state()) {
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TaskState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(state, deserialized);
    }
}
