//! Order Workflow
//!
//! This example processes e-commerce orders whose events carry data.
//!
//! Key concepts:
//! - Payload events keyed by a separate, payload-free kind
//! - Guards gating a rule on the entity's contents
//! - A handler that inspects the entity before running a command
//! - Checkpointing the final order with its history
//!
//! Run with: RUST_LOG=debug cargo run --example order_workflow

use lifecycle::checkpoint::Checkpoint;
use lifecycle::core::Event;
use lifecycle::engine::{EngineBuilder, StateMachineEngine, Traced};
use lifecycle::table::{simple_rule, BuildError, RuleBuilder};
use lifecycle::{command_enum, field_lens, state_enum};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

state_enum! {
    enum OrderState {
        Draft,
        Paid,
        Shipped,
        Delivered,
        Cancelled,
    }
    final: [Delivered, Cancelled]
    error: [Cancelled]
}

// Events carry payloads; rules match on the kind only
#[derive(Clone, Debug)]
enum OrderEvent {
    PaymentReceived { amount_cents: u64 },
    Dispatched { carrier: String },
    Delivered,
    Cancelled { reason: String },
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum OrderEventKind {
    PaymentReceived,
    Dispatched,
    Delivered,
    Cancelled,
}

impl Event for OrderEvent {
    type Kind = OrderEventKind;

    fn kind(&self) -> OrderEventKind {
        match self {
            Self::PaymentReceived { .. } => OrderEventKind::PaymentReceived,
            Self::Dispatched { .. } => OrderEventKind::Dispatched,
            Self::Delivered => OrderEventKind::Delivered,
            Self::Cancelled { .. } => OrderEventKind::Cancelled,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::PaymentReceived { .. } => "PaymentReceived",
            Self::Dispatched { .. } => "Dispatched",
            Self::Delivered => "Delivered",
            Self::Cancelled { .. } => "Cancelled",
        }
    }
}

command_enum! {
    enum OrderCommand {
        CapturePayment,
        CreateShipment,
        Refund,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Order {
    id: u64,
    total_cents: u64,
    shipping_address: Option<String>,
    state: OrderState,
}

// Imperative shell: the only place side effects happen
fn run_command(order: &Order, command: &OrderCommand) -> Result<(), String> {
    match command {
        OrderCommand::CapturePayment => {
            println!("  [Payment] Capturing ${:.2}", order.total_cents as f64 / 100.0);
            Ok(())
        }
        OrderCommand::CreateShipment => {
            let address = order
                .shipping_address
                .as_ref()
                .ok_or_else(|| format!("order {} has no shipping address", order.id))?;
            println!("  [Shipping] Creating shipment to {}", address);
            Ok(())
        }
        OrderCommand::Refund => {
            println!("  [Payment] Refunding order {}", order.id);
            Ok(())
        }
    }
}

type OrderHandler = Traced<fn(&Order, &OrderCommand) -> Result<(), String>>;

fn build_engine(
) -> Result<StateMachineEngine<Order, OrderState, OrderEvent, OrderCommand, OrderHandler>, BuildError>
{
    EngineBuilder::new()
        .rule(
            RuleBuilder::new()
                .from(OrderState::Draft)
                .on(OrderEventKind::PaymentReceived)
                .to(OrderState::Paid)
                .command(OrderCommand::CapturePayment)
                .when(|order: &Order| order.total_cents > 0),
        )?
        .rule(
            RuleBuilder::new()
                .from(OrderState::Paid)
                .on(OrderEventKind::Dispatched)
                .to(OrderState::Shipped)
                .command(OrderCommand::CreateShipment),
        )?
        .rule(
            RuleBuilder::new()
                .from(OrderState::Paid)
                .on(OrderEventKind::Cancelled)
                .to(OrderState::Cancelled)
                .command(OrderCommand::Refund),
        )?
        .add_rule(simple_rule(
            OrderState::Draft,
            OrderEventKind::Cancelled,
            OrderState::Cancelled,
        ))
        .add_rule(simple_rule(
            OrderState::Shipped,
            OrderEventKind::Delivered,
            OrderState::Delivered,
        ))
        .lens(field_lens!(Order, state))
        .handler(Traced::new(
            "order-service",
            run_command as fn(&Order, &OrderCommand) -> Result<(), String>,
        ))
        .build()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Order Workflow ===\n");

    let engine = match build_engine() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("invalid transition table: {}", e);
            return;
        }
    };

    println!("States in the workflow: {:?}\n", engine.table().states());

    let order = Order {
        id: 42,
        total_cents: 12_999,
        shipping_address: Some("221B Baker Street".to_string()),
        state: OrderState::Draft,
    };

    println!("Happy path for order {}:", order.id);
    let events = [
        OrderEvent::PaymentReceived { amount_cents: 12_999 },
        OrderEvent::Dispatched {
            carrier: "parcel-post".to_string(),
        },
        OrderEvent::Delivered,
    ];
    for event in &events {
        match event {
            OrderEvent::PaymentReceived { amount_cents } => {
                println!("  Customer paid {} cents", amount_cents)
            }
            OrderEvent::Dispatched { carrier } => println!("  Handing over to {}", carrier),
            _ => {}
        }
    }
    let (delivered, history) = match engine.apply_all(&order, &events) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("  {}", e);
            return;
        }
    };
    for transition in history.transitions() {
        println!(
            "  {:?} -> {:?} on {}",
            transition.from, transition.to, transition.event
        );
    }
    println!("  Final state: {:?}\n", delivered.state);

    println!("Free orders cannot be paid:");
    let free = Order {
        total_cents: 0,
        ..order.clone()
    };
    match engine.apply(&free, &OrderEvent::PaymentReceived { amount_cents: 0 }) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  {}", e),
    }
    println!();

    println!("Paid orders without an address cannot ship:");
    let paid = Order {
        id: 43,
        shipping_address: None,
        state: OrderState::Paid,
        ..order.clone()
    };
    let dispatch = OrderEvent::Dispatched {
        carrier: "parcel-post".to_string(),
    };
    match engine.apply(&paid, &dispatch) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  {} (still {:?})", e, paid.state),
    }
    let cancel = OrderEvent::Cancelled {
        reason: "customer request".to_string(),
    };
    if let OrderEvent::Cancelled { reason } = &cancel {
        println!("  Cancelling: {}", reason);
    }
    match engine.apply(&paid, &cancel) {
        Ok(cancelled) => println!("  Now {:?}", cancelled.state),
        Err(e) => println!("  {}", e),
    }
    println!();

    println!("Checkpointing the delivered order:");
    let checkpoint = Checkpoint::new(delivered, history);
    match checkpoint.to_bytes() {
        Ok(bytes) => {
            println!("  Encoded {} bytes (checkpoint {})", bytes.len(), checkpoint.id);
            match Checkpoint::<Order, OrderState>::from_bytes(&bytes) {
                Ok(restored) => println!(
                    "  Restored order {} in {:?}, consistent: {}",
                    restored.entity.id,
                    restored.entity.state,
                    restored.validate(engine.lens()).is_ok()
                ),
                Err(e) => eprintln!("  {}", e),
            }
        }
        Err(e) => eprintln!("  {}", e),
    }

    println!("\n=== Example Complete ===");
}
