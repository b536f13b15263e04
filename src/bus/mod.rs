//! Bus - synchronous, type-polymorphic message dispatch.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Bus (cloneable handle)                    │
//! │  - subscribe() / unsubscribe()                              │
//! │  - post(message) → PostReport | BusError::FatalDelivery      │
//! └─────────────────────────────────────────────────────────────┘
//!          │                  │                     │
//!          ▼                  ▼                     ▼
//! ┌─────────────────┐ ┌───────────────┐ ┌──────────────────────┐
//! │SubscriberRegistry│ │   Mailboxes   │ │ DeadLetterHandler    │
//! │ type → mailboxes │ │  receive(msg) │ │ FailedPostHandler    │
//! └─────────────────┘ └───────────────┘ └──────────────────────┘
//! ```
//!
//! A post resolves its mailboxes from a registry snapshot, releases the
//! registry, then calls each mailbox in turn on the posting thread.
//! Mailboxes may therefore subscribe, unsubscribe or post from inside
//! `receive` without deadlocking.

mod builder;
mod bus;
#[cfg(feature = "config")]
mod config;

pub use builder::BusBuilder;
pub use bus::{Bus, BusId, PostReport};
#[cfg(feature = "config")]
pub use config::{BusConfig, HookPolicy};
