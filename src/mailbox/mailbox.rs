//! Core mailbox trait and its failure classes.

use std::error::Error;

use thiserror::Error;

use crate::message::{AnyMessage, MessageType};

/// Boxed error carried by delivery failures.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// A registered consumer handling one message per call.
///
/// `receive` runs synchronously on the posting thread. Return
/// [`DeliveryError::Recoverable`] for expected, domain-level failures (the
/// bus reports them and carries on) and [`DeliveryError::Fatal`] for
/// programming defects (the bus aborts the post and hands the error back to
/// the poster). Panics are never caught.
pub trait Mailbox: Send + Sync {
    fn receive(&self, message: &dyn AnyMessage) -> Result<(), DeliveryError>;

    /// Name used in logs and envelopes.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Outcome of a failed `receive`.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The mailbox handled the message and failed in an expected way.
    #[error("recoverable delivery failure: {0}")]
    Recoverable(#[source] BoxError),
    /// The mailbox hit a programming defect.
    #[error("fatal delivery failure: {0}")]
    Fatal(#[source] BoxError),
}

impl DeliveryError {
    pub fn recoverable(err: impl Into<BoxError>) -> Self {
        DeliveryError::Recoverable(err.into())
    }

    pub fn fatal(err: impl Into<BoxError>) -> Self {
        DeliveryError::Fatal(err.into())
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, DeliveryError::Fatal(_))
    }

    /// The underlying error, whatever the class.
    pub fn into_inner(self) -> BoxError {
        match self {
            DeliveryError::Recoverable(e) | DeliveryError::Fatal(e) => e,
        }
    }
}

/// A typed mailbox received a message with no view as its declared type.
///
/// Raised when a hierarchy declares a parent without providing a view for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("message of type {actual} has no view as {expected}")]
pub struct MessageViewUnavailable {
    pub expected: &'static str,
    pub actual: MessageType,
}
