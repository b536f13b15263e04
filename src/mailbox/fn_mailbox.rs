//! Closure-backed mailboxes.

use std::any::{self, Any};
use std::fmt;
use std::marker::PhantomData;

use super::{DeliveryError, Mailbox, MessageViewUnavailable};
use crate::message::AnyMessage;

/// Untyped mailbox calling a closure with the erased message.
pub struct FnMailbox<F> {
    name: String,
    handler: F,
}

impl<F> FnMailbox<F>
where
    F: Fn(&dyn AnyMessage) -> Result<(), DeliveryError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }
}

impl<F> Mailbox for FnMailbox<F>
where
    F: Fn(&dyn AnyMessage) -> Result<(), DeliveryError> + Send + Sync,
{
    fn receive(&self, message: &dyn AnyMessage) -> Result<(), DeliveryError> {
        (self.handler)(message)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Mailbox calling a closure with the message viewed as `T`.
///
/// `T` is normally the type the mailbox is subscribed to, so every message
/// it receives is a `T` or has a `T` view. A message without one is a
/// broken hierarchy and fails fatally with [`MessageViewUnavailable`].
pub struct TypedMailbox<T, F> {
    name: String,
    handler: F,
    _marker: PhantomData<fn(&T)>,
}

impl<T, F> TypedMailbox<T, F>
where
    T: Any,
    F: Fn(&T) -> Result<(), DeliveryError> + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self::named(any::type_name::<F>(), handler)
    }

    pub fn named(name: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            handler,
            _marker: PhantomData,
        }
    }
}

impl<T, F> Mailbox for TypedMailbox<T, F>
where
    T: Any,
    F: Fn(&T) -> Result<(), DeliveryError> + Send + Sync,
{
    fn receive(&self, message: &dyn AnyMessage) -> Result<(), DeliveryError> {
        match message.downcast_ref::<T>() {
            Some(typed) => (self.handler)(typed),
            None => Err(DeliveryError::fatal(MessageViewUnavailable {
                expected: any::type_name::<T>(),
                actual: message.message_type(),
            })),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<T, F> fmt::Debug for TypedMailbox<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedMailbox")
            .field("name", &self.name)
            .field("type", &any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Message, MessageType};
    use std::any::TypeId;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct Tick(u32);
    impl Message for Tick {}

    #[derive(Debug)]
    struct Flagged;
    impl Message for Flagged {}

    #[derive(Debug)]
    struct FlaggedTick(Tick);
    impl Message for FlaggedTick {
        fn parents() -> Vec<MessageType> {
            vec![MessageType::of::<Tick>(), MessageType::of::<Flagged>()]
        }

        fn view(&self, ty: TypeId) -> Option<&dyn Any> {
            self.0.view_as(ty)
        }
    }

    #[test]
    fn typed_mailbox_receives_exact_and_viewed_types() {
        let total = AtomicU32::new(0);
        let mailbox = TypedMailbox::named("ticks", |tick: &Tick| {
            total.fetch_add(tick.0, Ordering::SeqCst);
            Ok(())
        });

        mailbox.receive(&Tick(2)).unwrap();
        mailbox.receive(&FlaggedTick(Tick(5))).unwrap();

        assert_eq!(total.load(Ordering::SeqCst), 7);
        assert_eq!(mailbox.name(), "ticks");
    }

    #[test]
    fn typed_mailbox_without_view_fails_fatally() {
        let mailbox = TypedMailbox::new(|_: &Flagged| Ok(()));

        let err = mailbox.receive(&FlaggedTick(Tick(1))).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("has no view as"));
    }

    #[test]
    fn fn_mailbox_passes_erased_message() {
        let mailbox = FnMailbox::new("probe", |message: &dyn AnyMessage| {
            if message.is::<Tick>() {
                Ok(())
            } else {
                Err(DeliveryError::recoverable("not a tick"))
            }
        });

        assert!(mailbox.receive(&Tick(0)).is_ok());
        assert!(!mailbox.receive(&Flagged).unwrap_err().is_fatal());
    }
}
