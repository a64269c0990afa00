//! Transition tables: the single source of truth for legal lifecycle movement.
//!
//! This module provides rules, a validating table, fluent builders, and macros
//! for declaring states, events, and commands with minimal boilerplate.

pub mod error;
pub mod macros;
pub mod rule;
pub mod transitions;

pub use error::BuildError;
pub use rule::{Rule, RuleBuilder};
pub use transitions::{TableBuilder, TransitionTable};

use crate::core::{Command, Event, State};

/// Create an unguarded rule that runs no command.
///
/// # Example
///
/// ```
/// use lifecycle::table::{simple_rule, Rule};
/// use lifecycle::{command_enum, event_enum, state_enum};
///
/// state_enum! {
///     enum Door {
///         Open,
///         Closed,
///     }
/// }
///
/// event_enum! {
///     enum DoorEvent {
///         Pushed,
///     }
/// }
///
/// command_enum! {
///     enum DoorCommand {
///         Lock,
///     }
/// }
///
/// let rule: Rule<(), Door, DoorEvent, DoorCommand> =
///     simple_rule(Door::Open, DoorEvent::Pushed, Door::Closed);
/// assert!(rule.command.is_none());
/// ```
pub fn simple_rule<T, S, Ev, C>(from: S, on: Ev::Kind, to: S) -> Rule<T, S, Ev, C>
where
    S: State,
    Ev: Event,
    C: Command,
{
    Rule::new(from, on, to)
}

/// Create an unguarded rule that runs `command` before committing.
pub fn command_rule<T, S, Ev, C>(from: S, on: Ev::Kind, to: S, command: C) -> Rule<T, S, Ev, C>
where
    S: State,
    Ev: Event,
    C: Command,
{
    Rule::new(from, on, to).with_command(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{command_enum, event_enum, state_enum};

    state_enum! {
        enum TaskState {
            Scheduled,
            InProgress,
        }
    }

    event_enum! {
        enum TaskEvent {
            TaskStarted,
        }
    }

    command_enum! {
        enum TaskCommand {
            Execute,
        }
    }

    #[test]
    fn simple_rule_builds() {
        let rule: Rule<(), TaskState, TaskEvent, TaskCommand> = simple_rule(
            TaskState::Scheduled,
            TaskEvent::TaskStarted,
            TaskState::InProgress,
        );

        assert_eq!(rule.from, TaskState::Scheduled);
        assert_eq!(rule.to, TaskState::InProgress);
        assert!(rule.command.is_none());
        assert!(rule.guard.is_none());
    }

    #[test]
    fn command_rule_attaches_command() {
        let rule: Rule<(), TaskState, TaskEvent, TaskCommand> = command_rule(
            TaskState::Scheduled,
            TaskEvent::TaskStarted,
            TaskState::InProgress,
            TaskCommand::Execute,
        );

        assert_eq!(rule.command, Some(TaskCommand::Execute));
    }
}
