//! Shared fixtures: a small message hierarchy and a recording mailbox.
//!
//! ```text
//!              *
//!              │
//!         DomainEvent          Auditable (marker)
//!              │                   │
//!         OrderEvent ──────────────┤
//!        ┌─────┴──────┐            │
//!  OrderPlaced   OrderCancelled ───┘
//! ```

#![allow(dead_code)]

use std::any::{Any, TypeId};
use std::sync::{Arc, Mutex};

use mailbus::{AnyMessage, DeliveryError, Mailbox, MailboxHandle, Message, MessageType};

#[derive(Debug, Clone)]
pub struct DomainEvent {
    pub id: u64,
}
impl Message for DomainEvent {}

#[derive(Debug)]
pub struct Auditable;
impl Message for Auditable {}

#[derive(Debug, Clone)]
pub struct OrderEvent {
    pub domain: DomainEvent,
    pub order_id: String,
}
impl Message for OrderEvent {
    fn parents() -> Vec<MessageType> {
        vec![MessageType::of::<DomainEvent>()]
    }

    fn view(&self, ty: TypeId) -> Option<&dyn Any> {
        self.domain.view_as(ty)
    }
}

#[derive(Debug, Clone)]
pub struct OrderPlaced {
    pub order: OrderEvent,
    pub total_cents: u64,
}
impl Message for OrderPlaced {
    fn parents() -> Vec<MessageType> {
        vec![MessageType::of::<OrderEvent>()]
    }

    fn view(&self, ty: TypeId) -> Option<&dyn Any> {
        self.order.view_as(ty)
    }
}

#[derive(Debug, Clone)]
pub struct OrderCancelled {
    pub order: OrderEvent,
    pub reason: String,
}
impl Message for OrderCancelled {
    fn parents() -> Vec<MessageType> {
        vec![MessageType::of::<OrderEvent>(), MessageType::of::<Auditable>()]
    }

    fn view(&self, ty: TypeId) -> Option<&dyn Any> {
        self.order.view_as(ty)
    }
}

pub fn order_placed(id: u64, order_id: &str) -> OrderPlaced {
    OrderPlaced {
        order: OrderEvent {
            domain: DomainEvent { id },
            order_id: order_id.to_string(),
        },
        total_cents: 1_000,
    }
}

pub fn order_cancelled(id: u64, order_id: &str) -> OrderCancelled {
    OrderCancelled {
        order: OrderEvent {
            domain: DomainEvent { id },
            order_id: order_id.to_string(),
        },
        reason: "customer request".to_string(),
    }
}

/// How a [`Recorder`] answers each delivery.
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Accept,
    Recoverable(&'static str),
    Fatal(&'static str),
}

/// Mailbox that records the domain id of everything it receives.
pub struct Recorder {
    name: String,
    behavior: Behavior,
    received: Mutex<Vec<u64>>,
}

impl Recorder {
    pub fn new(name: &str, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            behavior,
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn accepting(name: &str) -> Arc<Self> {
        Self::new(name, Behavior::Accept)
    }

    /// A fresh mailbox identity for this recorder.
    pub fn handle(self: &Arc<Self>) -> MailboxHandle {
        MailboxHandle::from(Arc::clone(self))
    }

    pub fn received(&self) -> Vec<u64> {
        self.received.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

impl Mailbox for Recorder {
    fn receive(&self, message: &dyn AnyMessage) -> Result<(), DeliveryError> {
        let id = message
            .downcast_ref::<DomainEvent>()
            .map(|event| event.id)
            .unwrap_or(u64::MAX);
        self.received.lock().unwrap().push(id);

        match self.behavior {
            Behavior::Accept => Ok(()),
            Behavior::Recoverable(reason) => Err(DeliveryError::recoverable(reason)),
            Behavior::Fatal(reason) => Err(DeliveryError::fatal(reason)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
