use thiserror::Error;

use crate::bus::BusId;
use crate::mailbox::{BoxError, MailboxId};
use crate::message::MessageType;

/// Errors surfaced to callers of the bus.
///
/// Recoverable delivery failures never appear here; they are reported
/// through the failed-post hook instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BusError {
    /// `unsubscribe` for a (type, mailbox) pair that is not registered.
    #[error("{mailbox} is not subscribed to {message_type}")]
    NotSubscribed {
        message_type: MessageType,
        mailbox: MailboxId,
    },

    /// A mailbox failed fatally; the rest of the post was abandoned.
    #[error("{mailbox} failed fatally on {message_type} posted to {bus}: {source}")]
    FatalDelivery {
        bus: BusId,
        mailbox: MailboxId,
        message_type: MessageType,
        #[source]
        source: BoxError,
    },

    /// The bus configuration could not be parsed.
    #[error("invalid bus configuration: {0}")]
    Config(String),
}

impl BusError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, BusError::FatalDelivery { .. })
    }
}

#[cfg(feature = "config")]
impl From<serde_json::Error> for BusError {
    fn from(err: serde_json::Error) -> Self {
        BusError::Config(err.to_string())
    }
}
