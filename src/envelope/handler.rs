//! Hooks the bus calls for dead letters and failed posts.

use std::sync::{Arc, Mutex, PoisonError};

use super::{DeadLetter, FailedPost};

/// Receives messages nobody was subscribed to.
pub trait DeadLetterHandler: Send + Sync {
    fn on_dead_letter(&self, dead_letter: &DeadLetter);
}

/// Receives recoverable per-mailbox delivery failures.
pub trait FailedPostHandler: Send + Sync {
    fn on_failed_post(&self, failed_post: &FailedPost);
}

impl<F> DeadLetterHandler for F
where
    F: Fn(&DeadLetter) + Send + Sync,
{
    fn on_dead_letter(&self, dead_letter: &DeadLetter) {
        self(dead_letter)
    }
}

impl<F> FailedPostHandler for F
where
    F: Fn(&FailedPost) + Send + Sync,
{
    fn on_failed_post(&self, failed_post: &FailedPost) {
        self(failed_post)
    }
}

/// Drops everything. The default for both hooks.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl DeadLetterHandler for Discard {
    fn on_dead_letter(&self, _dead_letter: &DeadLetter) {}
}

impl FailedPostHandler for Discard {
    fn on_failed_post(&self, _failed_post: &FailedPost) {}
}

/// Logs envelopes as `tracing` warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHandler;

impl DeadLetterHandler for LogHandler {
    fn on_dead_letter(&self, dead_letter: &DeadLetter) {
        tracing::warn!(
            bus = %dead_letter.bus(),
            message_type = %dead_letter.message_type(),
            message = ?dead_letter.message(),
            "dead letter: no mailbox subscribed"
        );
    }
}

impl FailedPostHandler for LogHandler {
    fn on_failed_post(&self, failed_post: &FailedPost) {
        tracing::warn!(
            bus = %failed_post.bus(),
            message_type = %failed_post.message_type(),
            mailbox = %failed_post.mailbox().id(),
            mailbox_name = failed_post.mailbox().name(),
            error = %failed_post.error(),
            "failed post: mailbox could not handle message"
        );
    }
}

/// Records envelopes for later inspection.
///
/// Clones share the same buffers, so one clone can be handed to the bus
/// while another is kept for assertions.
#[derive(Debug, Default, Clone)]
pub struct Collector {
    dead_letters: Arc<Mutex<Vec<DeadLetter>>>,
    failed_posts: Arc<Mutex<Vec<FailedPost>>>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        self.dead_letters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn failed_posts(&self) -> Vec<FailedPost> {
        self.failed_posts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Empty both buffers.
    pub fn clear(&self) {
        self.dead_letters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.failed_posts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl DeadLetterHandler for Collector {
    fn on_dead_letter(&self, dead_letter: &DeadLetter) {
        self.dead_letters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(dead_letter.clone());
    }
}

impl FailedPostHandler for Collector {
    fn on_failed_post(&self, failed_post: &FailedPost) {
        self.failed_posts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(failed_post.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::BusId;
    use crate::mailbox::{FnMailbox, MailboxHandle};
    use crate::message::Message;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Heartbeat;
    impl Message for Heartbeat {}

    fn dead_letter() -> DeadLetter {
        DeadLetter::new(BusId::new("test"), Arc::new(Heartbeat))
    }

    fn failed_post() -> FailedPost {
        FailedPost::new(
            BusId::new("test"),
            MailboxHandle::new(FnMailbox::new("flaky", |_| Ok(()))),
            Arc::new(Heartbeat),
            Arc::new(io::Error::new(io::ErrorKind::Other, "flaky")),
        )
    }

    #[test]
    fn closures_are_handlers() {
        let calls = AtomicUsize::new(0);
        let on_dead = |_: &DeadLetter| {
            calls.fetch_add(1, Ordering::SeqCst);
        };
        let on_failed = |_: &FailedPost| {
            calls.fetch_add(10, Ordering::SeqCst);
        };

        on_dead.on_dead_letter(&dead_letter());
        on_failed.on_failed_post(&failed_post());

        assert_eq!(calls.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn collector_clones_share_buffers() {
        let collector = Collector::new();
        let handed_out = collector.clone();

        handed_out.on_dead_letter(&dead_letter());
        handed_out.on_failed_post(&failed_post());
        handed_out.on_failed_post(&failed_post());

        assert_eq!(collector.dead_letters().len(), 1);
        assert_eq!(collector.failed_posts().len(), 2);
        assert_eq!(collector.failed_posts()[0].error().to_string(), "flaky");

        collector.clear();
        assert!(handed_out.dead_letters().is_empty());
        assert!(handed_out.failed_posts().is_empty());
    }

    #[test]
    fn discard_and_log_accept_everything() {
        Discard.on_dead_letter(&dead_letter());
        Discard.on_failed_post(&failed_post());
        LogHandler.on_dead_letter(&dead_letter());
        LogHandler.on_failed_post(&failed_post());
    }
}
