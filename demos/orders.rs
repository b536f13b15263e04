//! Order pipeline on one bus.
//!
//! Run with `RUST_LOG=mailbus=debug cargo run --example orders` to see the
//! bus's own logs next to the dead-letter and failed-post warnings.

use std::any::{Any, TypeId};
use std::sync::Arc;

use mailbus::{AnyMessage, Bus, BusConfig, DeliveryError, Message, MessageType};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct OrderEvent {
    order_id: String,
}
impl Message for OrderEvent {}

#[derive(Debug)]
struct OrderPlaced {
    event: OrderEvent,
    total_cents: u64,
}
impl Message for OrderPlaced {
    fn parents() -> Vec<MessageType> {
        vec![MessageType::of::<OrderEvent>()]
    }

    fn view(&self, ty: TypeId) -> Option<&dyn Any> {
        self.event.view_as(ty)
    }
}

#[derive(Debug)]
struct OrderShipped {
    event: OrderEvent,
    carrier: String,
}
impl Message for OrderShipped {
    fn parents() -> Vec<MessageType> {
        vec![MessageType::of::<OrderEvent>()]
    }

    fn view(&self, ty: TypeId) -> Option<&dyn Any> {
        self.event.view_as(ty)
    }
}

#[derive(Debug)]
struct InventoryRecount;
impl Message for InventoryRecount {}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mailbus=info")),
        )
        .init();

    let config = BusConfig::from_json_str(r#"{"name": "orders"}"#)?;
    let bus: Bus = config.builder().build();

    bus.subscribe_fn(|event: &OrderEvent| {
        println!("[audit] order {}", event.order_id);
        Ok(())
    });
    bus.subscribe_fn(|placed: &OrderPlaced| {
        if placed.total_cents > 100_000 {
            return Err(DeliveryError::recoverable("amount needs manual review"));
        }
        println!(
            "[billing] charging {} cents for {}",
            placed.total_cents, placed.event.order_id
        );
        Ok(())
    });
    bus.subscribe_fn(|shipped: &OrderShipped| {
        println!(
            "[notify] {} left with {}",
            shipped.event.order_id, shipped.carrier
        );
        Ok(())
    });

    let messages: Vec<Arc<dyn AnyMessage>> = vec![
        Arc::new(OrderPlaced {
            event: OrderEvent {
                order_id: "o-1".into(),
            },
            total_cents: 4_200,
        }),
        Arc::new(OrderPlaced {
            event: OrderEvent {
                order_id: "o-2".into(),
            },
            total_cents: 250_000,
        }),
        Arc::new(OrderShipped {
            event: OrderEvent {
                order_id: "o-1".into(),
            },
            carrier: "postal".into(),
        }),
        Arc::new(InventoryRecount),
    ];

    for message in messages {
        let message_type = message.message_type();
        let report = bus.post_shared(message)?;
        println!(
            "{message_type}: matched {}, failed {}",
            report.matched, report.failed
        );
    }

    Ok(())
}
