//! Task Lifecycle
//!
//! This example walks a task from Scheduled through to a final state.
//!
//! Key concepts:
//! - Task states (Scheduled -> InProgress -> Completed | Failed)
//! - Commands executed by a caller-supplied handler
//! - Rejected events leave the task untouched
//! - Handler activity reported through `tracing`
//!
//! Run with: RUST_LOG=debug cargo run --example task_lifecycle

use lifecycle::engine::{StateMachineEngine, Traced};
use lifecycle::table::{command_rule, simple_rule};
use lifecycle::{command_enum, event_enum, field_lens, state_enum};
use tracing_subscriber::EnvFilter;

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
    attempts: u32,
    state: TaskState,
}

// Imperative shell: pretend to hand the task to a worker
fn execute(task: &Task, command: &TaskCommand) -> Result<(), String> {
    println!("  [Worker] {:?} {}", command, task.name);
    if task.name.contains("flaky") {
        return Err(format!("worker rejected {}", task.name));
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Task Lifecycle ===\n");

    let engine: StateMachineEngine<Task, TaskState, TaskEvent, TaskCommand, _> =
        match StateMachineEngine::from_rules(
            vec![
                simple_rule(TaskState::Scheduled, TaskEvent::TaskScheduled, TaskState::Scheduled),
                command_rule(
                    TaskState::Scheduled,
                    TaskEvent::TaskStarted,
                    TaskState::InProgress,
                    TaskCommand::Execute,
                ),
                simple_rule(TaskState::InProgress, TaskEvent::TaskCompleted, TaskState::Completed),
                simple_rule(TaskState::InProgress, TaskEvent::TaskFailed, TaskState::Failed),
            ],
            field_lens!(Task, state),
            Traced::new("workers", execute),
        ) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("invalid transition table: {}", e);
                return;
            }
        };

    println!("Transition table:");
    for rule in engine.table().iter() {
        let command = rule
            .command
            .map(|c| format!(" [{:?}]", c))
            .unwrap_or_default();
        println!("  {:?} --{:?}--> {:?}{}", rule.from, rule.on, rule.to, command);
    }
    println!();

    let task = Task {
        name: "build-1".to_string(),
        attempts: 0,
        state: TaskState::Scheduled,
    };
    println!("Task {} starts in {:?}", task.name, task.state);
    println!("Permitted events: {:?}\n", engine.permitted_events(&task));

    println!("Completing before starting:");
    match engine.apply(&task, &TaskEvent::TaskCompleted) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  Rejected: {}", e),
    }
    println!("  Task is still {:?}\n", task.state);

    println!("Starting and completing:");
    let events = [TaskEvent::TaskStarted, TaskEvent::TaskCompleted];
    match engine.apply_all(&task, &events) {
        Ok((done, history)) => {
            println!("  Final state: {:?} (terminal: {})", done.state, engine.is_terminal(&done));
            println!("  Path: {:?}", history.get_path());
            println!("  Attempts field carried over: {}", done.attempts);
        }
        Err(e) => println!("  Replay failed: {}", e),
    }
    println!();

    println!("Starting a flaky task:");
    let flaky = Task {
        name: "flaky-2".to_string(),
        attempts: 3,
        state: TaskState::Scheduled,
    };
    match engine.apply(&flaky, &TaskEvent::TaskStarted) {
        Ok(next) => println!("  unexpected success: {:?}", next.state),
        Err(e) => {
            println!("  {}", e);
            println!("  Task is still {:?}", engine.state_of(&flaky));
        }
    }

    println!("\n=== Example Complete ===");
}
