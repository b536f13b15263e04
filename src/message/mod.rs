//! Messages and their runtime type hierarchy.
//!
//! Any `Send + Sync + Debug` struct becomes postable by implementing
//! [`Message`]. Hierarchies are declared, not inferred: a type lists its
//! direct parents, and may expose a view of itself as a parent when the
//! parent is carried by composition.
//!
//! ```text
//!            *  (MessageType::root)
//!            │
//!       OrderEvent
//!        ┌───┴────┐
//!  OrderPlaced  OrderCancelled
//! ```
//!
//! ## Example
//!
//! ```
//! use std::any::{Any, TypeId};
//! use mailbus::{AnyMessage, Message, MessageType};
//!
//! #[derive(Debug)]
//! struct OrderEvent {
//!     order_id: String,
//! }
//! impl Message for OrderEvent {}
//!
//! #[derive(Debug)]
//! struct OrderPlaced {
//!     event: OrderEvent,
//!     total_cents: u64,
//! }
//! impl Message for OrderPlaced {
//!     fn parents() -> Vec<MessageType> {
//!         vec![MessageType::of::<OrderEvent>()]
//!     }
//!     fn view(&self, ty: TypeId) -> Option<&dyn Any> {
//!         self.event.view_as(ty)
//!     }
//! }
//!
//! let placed = OrderPlaced {
//!     event: OrderEvent { order_id: "o-1".into() },
//!     total_cents: 500,
//! };
//! let erased: &dyn AnyMessage = &placed;
//! assert_eq!(erased.message_type(), MessageType::of::<OrderPlaced>());
//! assert_eq!(erased.downcast_ref::<OrderEvent>().unwrap().order_id, "o-1");
//! ```

mod message_type;

use std::any::{Any, TypeId};
use std::fmt;

pub use message_type::MessageType;

/// A payload that can be posted on a [`Bus`](crate::Bus).
pub trait Message: Any + Send + Sync + fmt::Debug + Sized {
    /// Declared direct ancestors of this type.
    fn parents() -> Vec<MessageType> {
        Vec::new()
    }

    /// View of this message as the ancestor `ty`.
    ///
    /// Only consulted for ancestors; the exact type is always viewable.
    /// Marker ancestors without a value representation return `None`.
    fn view(&self, _ty: TypeId) -> Option<&dyn Any> {
        None
    }
}

/// Type-erased message, implemented for every [`Message`].
pub trait AnyMessage: Any + Send + Sync + fmt::Debug {
    /// Runtime type of the message.
    fn message_type(&self) -> MessageType;

    fn as_any(&self) -> &dyn Any;

    /// View as `ty` if `ty` is the runtime type or an ancestor with a view.
    fn view_as(&self, ty: TypeId) -> Option<&dyn Any>;
}

impl<T: Message> AnyMessage for T {
    fn message_type(&self) -> MessageType {
        MessageType::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn view_as(&self, ty: TypeId) -> Option<&dyn Any> {
        if ty == TypeId::of::<T>() {
            Some(self)
        } else {
            Message::view(self, ty)
        }
    }
}

impl dyn AnyMessage {
    /// Borrow the message as `T`, its runtime type or a viewable ancestor.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.view_as(TypeId::of::<T>())?.downcast_ref::<T>()
    }

    /// Whether the runtime type is `T` exactly.
    pub fn is<T: Any>(&self) -> bool {
        self.message_type().id() == TypeId::of::<T>()
    }
}
