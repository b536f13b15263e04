//! Concurrent type → mailbox-set map with ancestor-aware lookup.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::BusError;
use crate::mailbox::MailboxHandle;
use crate::message::MessageType;

/// Mapping from message type to the mailboxes subscribed to exactly that type.
///
/// Polymorphism is resolved at lookup time: [`matching`](Self::matching)
/// walks the posted type's ancestors and unions their sets. Keys are plain
/// type identities, so unrelated types always keep independent entries.
///
/// All operations take the one internal lock for their whole duration, so
/// readers see each set either absent or complete. No mailbox code ever
/// runs under the lock, which is also why a poisoned lock is safe to reuse.
///
/// ## Example
///
/// ```
/// use mailbus::{FnMailbox, MailboxHandle, Message, MessageType, SubscriberRegistry};
///
/// #[derive(Debug)]
/// struct Ping;
/// impl Message for Ping {}
///
/// let registry = SubscriberRegistry::new();
/// let mailbox = MailboxHandle::new(FnMailbox::new("ping", |_| Ok(())));
///
/// registry.subscribe(MessageType::of::<Ping>(), mailbox.clone());
/// assert_eq!(registry.matching(&MessageType::of::<Ping>()), vec![mailbox.clone()]);
///
/// registry.unsubscribe(MessageType::of::<Ping>(), &mailbox).unwrap();
/// assert!(registry.is_empty());
/// ```
#[derive(Default)]
pub struct SubscriberRegistry {
    entries: RwLock<HashMap<MessageType, HashSet<MailboxHandle>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<MessageType, HashSet<MailboxHandle>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<MessageType, HashSet<MailboxHandle>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe `mailbox` to exactly `message_type`.
    ///
    /// Returns `false` if the pair was already registered; the call is then a no-op.
    pub fn subscribe(&self, message_type: MessageType, mailbox: MailboxHandle) -> bool {
        self.write()
            .entry(message_type)
            .or_default()
            .insert(mailbox)
    }

    /// Remove `mailbox` from `message_type`, pruning the entry once it is empty.
    pub fn unsubscribe(
        &self,
        message_type: MessageType,
        mailbox: &MailboxHandle,
    ) -> Result<(), BusError> {
        let mut entries = self.write();
        let not_subscribed = || BusError::NotSubscribed {
            message_type,
            mailbox: mailbox.id(),
        };

        let set = entries.get_mut(&message_type).ok_or_else(not_subscribed)?;
        if !set.remove(mailbox) {
            return Err(not_subscribed());
        }
        if set.is_empty() {
            entries.remove(&message_type);
        }
        Ok(())
    }

    /// Remove `mailbox` from every type. Returns how many subscriptions were dropped.
    pub fn unsubscribe_all(&self, mailbox: &MailboxHandle) -> usize {
        let mut entries = self.write();
        let mut removed = 0;
        entries.retain(|_, set| {
            if set.remove(mailbox) {
                removed += 1;
            }
            !set.is_empty()
        });
        removed
    }

    /// Every mailbox subscribed to `message_type` or one of its ancestors.
    ///
    /// Each mailbox appears once, even when subscribed under several
    /// ancestors. The result is a snapshot taken under a single read lock.
    pub fn matching(&self, message_type: &MessageType) -> Vec<MailboxHandle> {
        let ancestors = message_type.ancestors();
        let entries = self.read();

        let mut seen = HashSet::new();
        let mut matched = Vec::new();
        for ty in &ancestors {
            if let Some(set) = entries.get(ty) {
                for mailbox in set {
                    if seen.insert(mailbox.id()) {
                        matched.push(mailbox.clone());
                    }
                }
            }
        }
        matched
    }

    /// Whether anything would receive a message of `message_type`.
    pub fn has_matching(&self, message_type: &MessageType) -> bool {
        let ancestors = message_type.ancestors();
        let entries = self.read();
        ancestors.iter().any(|ty| entries.contains_key(ty))
    }

    pub fn is_subscribed(&self, message_type: &MessageType, mailbox: &MailboxHandle) -> bool {
        self.read()
            .get(message_type)
            .is_some_and(|set| set.contains(mailbox))
    }

    /// Number of mailboxes subscribed to exactly `message_type`.
    pub fn subscriber_count(&self, message_type: &MessageType) -> usize {
        self.read().get(message_type).map_or(0, HashSet::len)
    }

    /// Types with at least one subscriber.
    pub fn message_types(&self) -> Vec<MessageType> {
        self.read().keys().copied().collect()
    }

    /// Total number of (type, mailbox) subscriptions.
    pub fn len(&self) -> usize {
        self.read().values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }
}
