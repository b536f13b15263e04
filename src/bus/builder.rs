use std::sync::Arc;

use super::Bus;
use crate::envelope::{DeadLetterHandler, Discard, FailedPostHandler};

const DEFAULT_BUS_NAME: &str = "bus";

/// Configures hooks and identity before creating a [`Bus`].
///
/// Both hooks default to [`Discard`].
pub struct BusBuilder {
    name: Option<String>,
    dead_letters: Arc<dyn DeadLetterHandler>,
    failed_posts: Arc<dyn FailedPostHandler>,
}

impl Default for BusBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BusBuilder {
    pub fn new() -> Self {
        Self {
            name: None,
            dead_letters: Arc::new(Discard),
            failed_posts: Arc::new(Discard),
        }
    }

    /// Name shown in the bus id and in logs.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Hook called when a post matches no mailbox.
    pub fn on_dead_letter(mut self, handler: impl DeadLetterHandler + 'static) -> Self {
        self.dead_letters = Arc::new(handler);
        self
    }

    /// Hook called for each recoverable mailbox failure.
    pub fn on_failed_post(mut self, handler: impl FailedPostHandler + 'static) -> Self {
        self.failed_posts = Arc::new(handler);
        self
    }

    pub fn build(self) -> Bus {
        Bus::from_parts(
            self.name.as_deref().unwrap_or(DEFAULT_BUS_NAME),
            self.dead_letters,
            self.failed_posts,
        )
    }
}
