//! Envelopes describing undeliverable messages, and the hooks receiving them.
//!
//! ```text
//! post(message)
//!     │
//!     ├── 0 mailboxes matched ──────────► DeadLetter ──► DeadLetterHandler
//!     │
//!     └── N mailboxes matched
//!           ├── Ok ──────────────────────► (counted)
//!           ├── Err(Recoverable) ────────► FailedPost ──► FailedPostHandler
//!           └── Err(Fatal) ──────────────► BusError::FatalDelivery (returned)
//! ```
//!
//! Handlers run synchronously inside `post`, on the posting thread.

mod dead_letter;
mod failed_post;
mod handler;

pub use dead_letter::DeadLetter;
pub use failed_post::FailedPost;
pub use handler::{Collector, DeadLetterHandler, Discard, FailedPostHandler, LogHandler};
