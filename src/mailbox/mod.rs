//! Mailboxes - the consumer side of the bus.
//!
//! A [`Mailbox`] receives one message per call and reports one of three
//! outcomes: handled, failed recoverably, or failed fatally. Mailboxes are
//! registered through a [`MailboxHandle`], which gives them an identity
//! independent of their logic.

mod fn_mailbox;
mod handle;
mod mailbox;

pub use fn_mailbox::{FnMailbox, TypedMailbox};
pub use handle::{MailboxHandle, MailboxId};
pub use mailbox::{BoxError, DeliveryError, Mailbox, MessageViewUnavailable};
