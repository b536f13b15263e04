//! Runtime message type descriptors.

use std::any::{self, TypeId};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::{AnyMessage, Message};

/// Identifies a message type and knows its declared ancestors.
///
/// Equality and hashing use the underlying [`TypeId`] only, so two
/// descriptors for unrelated types are never equal, whatever their place
/// in a hierarchy.
#[derive(Clone, Copy)]
pub struct MessageType {
    id: TypeId,
    name: &'static str,
    parents: fn() -> Vec<MessageType>,
}

fn no_parents() -> Vec<MessageType> {
    Vec::new()
}

impl MessageType {
    /// Descriptor for the message type `T`.
    pub fn of<T: Message>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
            parents: T::parents,
        }
    }

    /// The implicit ancestor of every message type.
    ///
    /// A mailbox subscribed to the root receives every message posted on the bus.
    pub fn root() -> Self {
        Self {
            id: TypeId::of::<dyn AnyMessage>(),
            name: "*",
            parents: no_parents,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_root(&self) -> bool {
        *self == Self::root()
    }

    /// Declared direct ancestors.
    pub fn parents(&self) -> Vec<MessageType> {
        (self.parents)()
    }

    /// Inclusive ancestor set: `self` first, then every transitive parent
    /// once, then the root.
    pub fn ancestors(&self) -> Vec<MessageType> {
        let root = Self::root();
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        let mut pending = vec![*self];

        while let Some(ty) = pending.pop() {
            if ty == root || !seen.insert(ty.id) {
                continue;
            }
            ordered.push(ty);
            // Reverse so the first declared parent is visited first.
            pending.extend(ty.parents().into_iter().rev());
        }

        ordered.push(root);
        ordered
    }

    /// Whether `self` is `other` or one of its ancestors.
    pub fn is_ancestor_of(&self, other: &MessageType) -> bool {
        if self == other || self.is_root() {
            return true;
        }
        other.ancestors().contains(self)
    }
}

impl PartialEq for MessageType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MessageType {}

impl Hash for MessageType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageType({})", self.name)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Base;
    impl Message for Base {}

    #[derive(Debug)]
    struct Left;
    impl Message for Left {
        fn parents() -> Vec<MessageType> {
            vec![MessageType::of::<Base>()]
        }
    }

    #[derive(Debug)]
    struct Right;
    impl Message for Right {
        fn parents() -> Vec<MessageType> {
            vec![MessageType::of::<Base>()]
        }
    }

    #[derive(Debug)]
    struct Diamond;
    impl Message for Diamond {
        fn parents() -> Vec<MessageType> {
            vec![MessageType::of::<Left>(), MessageType::of::<Right>()]
        }
    }

    #[derive(Debug)]
    struct Unrelated;
    impl Message for Unrelated {}

    #[derive(Debug)]
    struct Ping;
    impl Message for Ping {
        fn parents() -> Vec<MessageType> {
            vec![MessageType::of::<Pong>()]
        }
    }

    #[derive(Debug)]
    struct Pong;
    impl Message for Pong {
        fn parents() -> Vec<MessageType> {
            vec![MessageType::of::<Ping>()]
        }
    }

    #[test]
    fn equality_is_by_type_identity() {
        assert_eq!(MessageType::of::<Base>(), MessageType::of::<Base>());
        assert_ne!(MessageType::of::<Base>(), MessageType::of::<Unrelated>());
        assert_ne!(MessageType::of::<Left>(), MessageType::of::<Right>());
    }

    #[test]
    fn ancestors_start_with_self_and_end_with_root() {
        let ancestors = MessageType::of::<Left>().ancestors();
        assert_eq!(
            ancestors,
            vec![
                MessageType::of::<Left>(),
                MessageType::of::<Base>(),
                MessageType::root()
            ]
        );
    }

    #[test]
    fn diamond_lists_shared_ancestor_once() {
        let ancestors = MessageType::of::<Diamond>().ancestors();
        assert_eq!(ancestors.len(), 5);
        assert_eq!(ancestors[0], MessageType::of::<Diamond>());
        let bases = ancestors
            .iter()
            .filter(|t| **t == MessageType::of::<Base>())
            .count();
        assert_eq!(bases, 1);
    }

    #[test]
    fn cyclic_parents_terminate() {
        let ancestors = MessageType::of::<Ping>().ancestors();
        assert_eq!(
            ancestors,
            vec![
                MessageType::of::<Ping>(),
                MessageType::of::<Pong>(),
                MessageType::root()
            ]
        );
    }

    #[test]
    fn ancestor_relation() {
        let base = MessageType::of::<Base>();
        let diamond = MessageType::of::<Diamond>();

        assert!(base.is_ancestor_of(&diamond));
        assert!(diamond.is_ancestor_of(&diamond));
        assert!(!diamond.is_ancestor_of(&base));
        assert!(!MessageType::of::<Unrelated>().is_ancestor_of(&diamond));
        assert!(MessageType::root().is_ancestor_of(&diamond));
        assert!(!diamond.is_ancestor_of(&MessageType::root()));
    }

    #[test]
    fn display_uses_type_name() {
        assert!(MessageType::of::<Base>().to_string().ends_with("Base"));
        assert_eq!(MessageType::root().to_string(), "*");
    }
}
