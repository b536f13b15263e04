//! The dispatch engine.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::BusBuilder;
use crate::envelope::{DeadLetter, DeadLetterHandler, FailedPost, FailedPostHandler};
use crate::error::BusError;
use crate::mailbox::{DeliveryError, MailboxHandle, TypedMailbox};
use crate::message::{AnyMessage, Message, MessageType};
use crate::registry::SubscriberRegistry;

static NEXT_BUS_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a bus, carried by every envelope it emits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BusId {
    id: u64,
    name: Arc<str>,
}

impl BusId {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            id: NEXT_BUS_ID.fetch_add(1, Ordering::Relaxed),
            name: Arc::from(name),
        }
    }

    pub fn as_u64(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

/// What happened to one post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostReport {
    /// Mailboxes the message was delivered to.
    pub matched: usize,
    /// Of those, how many failed recoverably.
    pub failed: usize,
}

impl PostReport {
    /// No mailbox matched; the message went to the dead-letter hook.
    pub fn is_dead_letter(&self) -> bool {
        self.matched == 0
    }

    pub fn succeeded(&self) -> usize {
        self.matched - self.failed
    }
}

struct Inner {
    id: BusId,
    registry: SubscriberRegistry,
    dead_letters: Arc<dyn DeadLetterHandler>,
    failed_posts: Arc<dyn FailedPostHandler>,
}

/// In-process publish/subscribe bus.
///
/// Messages are matched to mailboxes by runtime type: a mailbox subscribed
/// to a type receives every message of that type or of any type declaring
/// it as an ancestor. Delivery happens synchronously on the posting thread.
///
/// `Bus` is cheap to clone; clones are the same bus. Independent buses
/// never share subscriptions.
///
/// ## Example
///
/// ```
/// use mailbus::{Bus, Collector, Message};
///
/// #[derive(Debug)]
/// struct UserRegistered {
///     email: String,
/// }
/// impl Message for UserRegistered {}
///
/// let dead_letters = Collector::new();
/// let bus = Bus::builder()
///     .name("accounts")
///     .on_dead_letter(dead_letters.clone())
///     .build();
///
/// // Nobody listens yet: dead letter.
/// let report = bus
///     .post(UserRegistered { email: "a@example.com".into() })
///     .unwrap();
/// assert!(report.is_dead_letter());
/// assert_eq!(dead_letters.dead_letters().len(), 1);
///
/// bus.subscribe_fn(|event: &UserRegistered| {
///     assert!(event.email.contains('@'));
///     Ok(())
/// });
/// let report = bus
///     .post(UserRegistered { email: "b@example.com".into() })
///     .unwrap();
/// assert_eq!(report.matched, 1);
/// ```
#[derive(Clone)]
pub struct Bus {
    inner: Arc<Inner>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// A bus that discards dead letters and failed posts.
    pub fn new() -> Self {
        BusBuilder::new().build()
    }

    pub fn builder() -> BusBuilder {
        BusBuilder::new()
    }

    pub(crate) fn from_parts(
        name: &str,
        dead_letters: Arc<dyn DeadLetterHandler>,
        failed_posts: Arc<dyn FailedPostHandler>,
    ) -> Self {
        let id = BusId::new(name);
        tracing::debug!(bus = %id, "bus created");
        Self {
            inner: Arc::new(Inner {
                id,
                registry: SubscriberRegistry::new(),
                dead_letters,
                failed_posts,
            }),
        }
    }

    pub fn id(&self) -> &BusId {
        &self.inner.id
    }

    /// Subscribe `mailbox` to `message_type` and all its descendants.
    ///
    /// Returns `false` if already subscribed to exactly this type.
    pub fn subscribe(&self, message_type: MessageType, mailbox: MailboxHandle) -> bool {
        let mailbox_id = mailbox.id();
        let added = self.inner.registry.subscribe(message_type, mailbox);
        tracing::debug!(
            bus = %self.inner.id,
            message_type = %message_type,
            mailbox = %mailbox_id,
            added,
            "subscribe"
        );
        added
    }

    pub fn unsubscribe(
        &self,
        message_type: MessageType,
        mailbox: &MailboxHandle,
    ) -> Result<(), BusError> {
        self.inner.registry.unsubscribe(message_type, mailbox)?;
        tracing::debug!(
            bus = %self.inner.id,
            message_type = %message_type,
            mailbox = %mailbox.id(),
            "unsubscribe"
        );
        Ok(())
    }

    pub fn subscribe_to<T: Message>(&self, mailbox: MailboxHandle) -> bool {
        self.subscribe(MessageType::of::<T>(), mailbox)
    }

    pub fn unsubscribe_from<T: Message>(&self, mailbox: &MailboxHandle) -> Result<(), BusError> {
        self.unsubscribe(MessageType::of::<T>(), mailbox)
    }

    /// Subscribe a closure to `T`, receiving each message viewed as `&T`.
    ///
    /// Returns the new mailbox's handle, needed to unsubscribe it later.
    pub fn subscribe_fn<T, F>(&self, handler: F) -> MailboxHandle
    where
        T: Message,
        F: Fn(&T) -> Result<(), DeliveryError> + Send + Sync + 'static,
    {
        let mailbox = MailboxHandle::new(TypedMailbox::<T, F>::new(handler));
        self.subscribe_to::<T>(mailbox.clone());
        mailbox
    }

    /// Remove `mailbox` from every type it is subscribed to.
    pub fn unsubscribe_all(&self, mailbox: &MailboxHandle) -> usize {
        let removed = self.inner.registry.unsubscribe_all(mailbox);
        tracing::debug!(
            bus = %self.inner.id,
            mailbox = %mailbox.id(),
            removed,
            "unsubscribe all"
        );
        removed
    }

    pub fn is_subscribed(&self, message_type: &MessageType, mailbox: &MailboxHandle) -> bool {
        self.inner.registry.is_subscribed(message_type, mailbox)
    }

    /// Mailboxes subscribed to exactly `message_type`.
    pub fn subscriber_count(&self, message_type: &MessageType) -> usize {
        self.inner.registry.subscriber_count(message_type)
    }

    /// Whether a message of `message_type` would reach at least one mailbox.
    pub fn has_subscribers_for(&self, message_type: &MessageType) -> bool {
        self.inner.registry.has_matching(message_type)
    }

    /// Deliver `message` to every matching mailbox.
    ///
    /// Recoverable mailbox failures are reported to the failed-post hook and
    /// do not stop delivery to the others. A fatal failure abandons the
    /// remaining mailboxes and is returned as [`BusError::FatalDelivery`].
    /// When nothing matches, the dead-letter hook gets the message.
    pub fn post<M: Message>(&self, message: M) -> Result<PostReport, BusError> {
        self.post_shared(Arc::new(message))
    }

    /// [`post`](Self::post) for a message that is already shared.
    pub fn post_shared(&self, message: Arc<dyn AnyMessage>) -> Result<PostReport, BusError> {
        let message_type = message.message_type();
        let mailboxes = self.inner.registry.matching(&message_type);
        let mut report = PostReport {
            matched: mailboxes.len(),
            failed: 0,
        };

        tracing::trace!(
            bus = %self.inner.id,
            message_type = %message_type,
            matched = report.matched,
            "post"
        );

        for mailbox in mailboxes {
            match mailbox.receive(message.as_ref()) {
                Ok(()) => {}
                Err(DeliveryError::Recoverable(err)) => {
                    report.failed += 1;
                    tracing::debug!(
                        bus = %self.inner.id,
                        message_type = %message_type,
                        mailbox = %mailbox.id(),
                        error = %err,
                        "recoverable delivery failure"
                    );
                    let failed = FailedPost::new(
                        self.inner.id.clone(),
                        mailbox,
                        Arc::clone(&message),
                        Arc::from(err),
                    );
                    self.inner.failed_posts.on_failed_post(&failed);
                }
                Err(DeliveryError::Fatal(source)) => {
                    tracing::debug!(
                        bus = %self.inner.id,
                        message_type = %message_type,
                        mailbox = %mailbox.id(),
                        error = %source,
                        "fatal delivery failure"
                    );
                    return Err(BusError::FatalDelivery {
                        bus: self.inner.id.clone(),
                        mailbox: mailbox.id(),
                        message_type,
                        source,
                    });
                }
            }
        }

        if report.is_dead_letter() {
            let dead_letter = DeadLetter::new(self.inner.id.clone(), message);
            self.inner.dead_letters.on_dead_letter(&dead_letter);
        }

        Ok(report)
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("id", &self.inner.id)
            .field("subscriptions", &self.inner.registry.len())
            .finish()
    }
}
