//! Async Command Handler
//!
//! This example drives deployments whose commands talk to a slow remote
//! service.
//!
//! Key concepts:
//! - `AsyncCommandHandler` awaited before a transition commits
//! - One shared engine serving many concurrent entities
//! - Deadlines imposed by the caller with `tokio::time::timeout`
//!
//! Run with: RUST_LOG=debug cargo run --example async_handler

use async_trait::async_trait;
use lifecycle::engine::{AsyncCommandHandler, StateMachineEngine, Traced};
use lifecycle::table::{command_rule, simple_rule};
use lifecycle::{command_enum, event_enum, field_lens, state_enum};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum DeployState {
        Pending,
        Rolling,
        Live,
        RolledBack,
    }
    final: [Live, RolledBack]
    error: [RolledBack]
}

event_enum! {
    enum DeployEvent {
        Approved,
        Healthy,
        Unhealthy,
    }
}

command_enum! {
    enum DeployCommand {
        PushImage,
        Revert,
    }
}

#[derive(Clone, Debug)]
struct Deployment {
    service: String,
    replicas: u32,
    status: DeployState,
}

// Simulated orchestrator with per-call latency
struct Orchestrator {
    latency: Duration,
}

#[async_trait]
impl AsyncCommandHandler<Deployment, DeployCommand> for Orchestrator {
    type Error = String;

    async fn handle(&self, deployment: &Deployment, command: &DeployCommand) -> Result<(), String> {
        tokio::time::sleep(self.latency * deployment.replicas).await;
        match command {
            DeployCommand::PushImage if deployment.replicas == 0 => {
                Err(format!("{} has no replicas to update", deployment.service))
            }
            _ => {
                println!("  [Orchestrator] {:?} for {}", command, deployment.service);
                Ok(())
            }
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Async Command Handler ===\n");

    let engine: Arc<StateMachineEngine<Deployment, DeployState, DeployEvent, DeployCommand, _>> =
        match StateMachineEngine::from_rules(
            vec![
                command_rule(
                    DeployState::Pending,
                    DeployEvent::Approved,
                    DeployState::Rolling,
                    DeployCommand::PushImage,
                ),
                simple_rule(DeployState::Rolling, DeployEvent::Healthy, DeployState::Live),
                command_rule(
                    DeployState::Rolling,
                    DeployEvent::Unhealthy,
                    DeployState::RolledBack,
                    DeployCommand::Revert,
                ),
            ],
            field_lens!(Deployment, status),
            Traced::new(
                "orchestrator",
                Orchestrator {
                    latency: Duration::from_millis(20),
                },
            ),
        ) {
            Ok(engine) => Arc::new(engine),
            Err(e) => {
                eprintln!("invalid transition table: {}", e);
                return;
            }
        };

    println!("Approving three deployments concurrently:");
    let deployments = [("api", 2), ("search", 3), ("billing", 0)];
    let handles: Vec<_> = deployments
        .into_iter()
        .map(|(service, replicas)| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                let deployment = Deployment {
                    service: service.to_string(),
                    replicas,
                    status: DeployState::Pending,
                };
                let outcome = engine.apply_async(&deployment, &DeployEvent::Approved).await;
                (deployment, outcome)
            })
        })
        .collect();

    let mut rolling = Vec::new();
    for handle in handles {
        match handle.await {
            Ok((_, Ok(next))) => {
                println!("  {} is now {:?}", next.service, next.status);
                rolling.push(next);
            }
            Ok((original, Err(e))) => {
                println!("  {} stays {:?}: {}", original.service, original.status, e);
            }
            Err(e) => println!("  task panicked: {}", e),
        }
    }
    println!();

    println!("Reverting with a tight deadline:");
    if let Some(slow) = rolling.iter().find(|d| d.replicas > 2) {
        let deadline = Duration::from_millis(30);
        match tokio::time::timeout(deadline, engine.apply_async(slow, &DeployEvent::Unhealthy)).await {
            Ok(Ok(next)) => println!("  {} is now {:?}", next.service, next.status),
            Ok(Err(e)) => println!("  {}", e),
            Err(_) => println!(
                "  Revert of {} exceeded {:?}; entity still {:?}",
                slow.service, deadline, slow.status
            ),
        }
    }

    println!("\nMarking the rest healthy:");
    for deployment in rolling.iter().filter(|d| d.replicas <= 2) {
        match engine.apply_async(deployment, &DeployEvent::Healthy).await {
            Ok(next) => println!("  {} is now {:?}", next.service, next.status),
            Err(e) => println!("  {}", e),
        }
    }

    println!("\n=== Example Complete ===");
}
