//! # mailbus
//!
//! An in-process publish/subscribe bus for Plain Old Rust Structs.
//!
//! Producers [`post`](Bus::post) typed messages; mailboxes subscribe to a
//! message type and receive every message of that type or of any type that
//! declares it as an ancestor. Delivery is synchronous, one mailbox at a time,
//! on the posting thread.
//!
//! - Unmatched messages become [`DeadLetter`]s for the dead-letter hook.
//! - Recoverable mailbox failures become [`FailedPost`]s for the
//!   failed-post hook, without disturbing the other mailboxes.
//! - Fatal mailbox failures abort the post and come back as
//!   [`BusError::FatalDelivery`].
//!
//! ```
//! use std::any::{Any, TypeId};
//! use mailbus::{AnyMessage, Bus, Collector, DeliveryError, Message, MessageType};
//!
//! #[derive(Debug)]
//! struct PaymentEvent {
//!     payment_id: String,
//! }
//! impl Message for PaymentEvent {}
//!
//! #[derive(Debug)]
//! struct PaymentDeclined {
//!     event: PaymentEvent,
//!     reason: String,
//! }
//! impl Message for PaymentDeclined {
//!     fn parents() -> Vec<MessageType> {
//!         vec![MessageType::of::<PaymentEvent>()]
//!     }
//!     fn view(&self, ty: TypeId) -> Option<&dyn Any> {
//!         self.event.view_as(ty)
//!     }
//! }
//!
//! let failures = Collector::new();
//! let bus = Bus::builder()
//!     .name("payments")
//!     .on_failed_post(failures.clone())
//!     .build();
//!
//! // Sees every payment event, declines included.
//! bus.subscribe_fn(|event: &PaymentEvent| {
//!     assert_eq!(event.payment_id, "p-1");
//!     Ok(())
//! });
//! // Only declines, and always fails to handle them.
//! bus.subscribe_fn(|_: &PaymentDeclined| Err(DeliveryError::recoverable("mailer offline")));
//!
//! let report = bus
//!     .post(PaymentDeclined {
//!         event: PaymentEvent { payment_id: "p-1".into() },
//!         reason: "insufficient funds".into(),
//!     })
//!     .unwrap();
//!
//! assert_eq!(report.matched, 2);
//! assert_eq!(report.failed, 1);
//! assert_eq!(failures.failed_posts()[0].error().to_string(), "mailer offline");
//! ```

pub mod bus;
pub mod envelope;
mod error;
pub mod mailbox;
pub mod message;
pub mod registry;

#[cfg(feature = "config")]
pub use bus::{BusConfig, HookPolicy};
pub use bus::{Bus, BusBuilder, BusId, PostReport};
pub use envelope::{
    Collector, DeadLetter, DeadLetterHandler, Discard, FailedPost, FailedPostHandler, LogHandler,
};
pub use error::BusError;
pub use mailbox::{
    BoxError, DeliveryError, FnMailbox, Mailbox, MailboxHandle, MailboxId,
    MessageViewUnavailable, TypedMailbox,
};
pub use message::{AnyMessage, Message, MessageType};
pub use registry::SubscriberRegistry;
