use std::sync::Arc;

use crate::bus::BusId;
use crate::message::{AnyMessage, MessageType};

/// A message that matched no mailbox when it was posted.
#[derive(Debug, Clone)]
pub struct DeadLetter {
    bus: BusId,
    message: Arc<dyn AnyMessage>,
}

impl DeadLetter {
    pub(crate) fn new(bus: BusId, message: Arc<dyn AnyMessage>) -> Self {
        Self { bus, message }
    }

    /// Bus the message was posted to.
    pub fn bus(&self) -> &BusId {
        &self.bus
    }

    pub fn message(&self) -> &dyn AnyMessage {
        self.message.as_ref()
    }

    /// Shared handle to the message, e.g. to repost it elsewhere.
    pub fn shared_message(&self) -> Arc<dyn AnyMessage> {
        Arc::clone(&self.message)
    }

    pub fn message_type(&self) -> MessageType {
        self.message.message_type()
    }
}
