//! Subscriber registry - which mailboxes listen to which message types.

mod subscriber_registry;

pub use subscriber_registry::SubscriberRegistry;
