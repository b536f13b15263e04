use std::error::Error;
use std::sync::Arc;

use crate::bus::BusId;
use crate::mailbox::MailboxHandle;
use crate::message::{AnyMessage, MessageType};

/// A delivery whose handling failed recoverably.
///
/// The message did reach the mailbox; the mailbox reported an expected failure.
#[derive(Debug, Clone)]
pub struct FailedPost {
    bus: BusId,
    mailbox: MailboxHandle,
    message: Arc<dyn AnyMessage>,
    error: Arc<dyn Error + Send + Sync>,
}

impl FailedPost {
    pub(crate) fn new(
        bus: BusId,
        mailbox: MailboxHandle,
        message: Arc<dyn AnyMessage>,
        error: Arc<dyn Error + Send + Sync>,
    ) -> Self {
        Self {
            bus,
            mailbox,
            message,
            error,
        }
    }

    pub fn bus(&self) -> &BusId {
        &self.bus
    }

    /// The mailbox that failed.
    pub fn mailbox(&self) -> &MailboxHandle {
        &self.mailbox
    }

    pub fn message(&self) -> &dyn AnyMessage {
        self.message.as_ref()
    }

    pub fn shared_message(&self) -> Arc<dyn AnyMessage> {
        Arc::clone(&self.message)
    }

    pub fn message_type(&self) -> MessageType {
        self.message.message_type()
    }

    /// The error the mailbox returned.
    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.error.as_ref()
    }
}
