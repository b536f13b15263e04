//! Mailbox identity.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::Mailbox;

static NEXT_MAILBOX_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique mailbox identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MailboxId(u64);

impl MailboxId {
    fn next() -> Self {
        MailboxId(NEXT_MAILBOX_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MailboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mailbox#{}", self.0)
    }
}

/// Shared handle to a mailbox, compared by identity.
///
/// Clones refer to the same mailbox. Wrapping the same logic twice yields
/// two distinct mailboxes, so subscribe/unsubscribe matching never depends
/// on what the mailbox does.
#[derive(Clone)]
pub struct MailboxHandle {
    id: MailboxId,
    mailbox: Arc<dyn Mailbox>,
}

impl MailboxHandle {
    pub fn new(mailbox: impl Mailbox + 'static) -> Self {
        Self::from_arc(Arc::new(mailbox))
    }

    pub fn from_arc(mailbox: Arc<dyn Mailbox>) -> Self {
        Self {
            id: MailboxId::next(),
            mailbox,
        }
    }

    pub fn id(&self) -> MailboxId {
        self.id
    }
}

impl Deref for MailboxHandle {
    type Target = dyn Mailbox;

    fn deref(&self) -> &Self::Target {
        self.mailbox.as_ref()
    }
}

impl<M: Mailbox + 'static> From<Arc<M>> for MailboxHandle {
    fn from(mailbox: Arc<M>) -> Self {
        Self::from_arc(mailbox)
    }
}

impl PartialEq for MailboxHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MailboxHandle {}

impl Hash for MailboxHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for MailboxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailboxHandle")
            .field("id", &self.id)
            .field("name", &self.mailbox.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox::DeliveryError;
    use crate::message::AnyMessage;
    use std::collections::HashSet;

    struct Sink;

    impl Mailbox for Sink {
        fn receive(&self, _message: &dyn AnyMessage) -> Result<(), DeliveryError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "sink"
        }
    }

    #[test]
    fn clones_share_identity() {
        let a = MailboxHandle::new(Sink);
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn same_logic_wrapped_twice_is_distinct() {
        let shared = Arc::new(Sink);
        let a = MailboxHandle::from(Arc::clone(&shared));
        let b = MailboxHandle::from(shared);
        assert_ne!(a, b);

        let set: HashSet<_> = [a.clone(), b, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn derefs_to_mailbox() {
        let handle = MailboxHandle::new(Sink);
        assert_eq!(handle.name(), "sink");
        assert!(format!("{:?}", handle).contains("sink"));
    }
}
