//! Canonical keys for the unique table.
//!
//! A key is the node's order plus, for every successor slot, the quantized
//! weight and the *identity* of the child. Comparing children by identity is
//! enough because children are canonical already: equal subgraphs are the
//! same reference.

use crate::node::Successors;
use crate::reference::NodeRef;
use crate::types::Order;
use crate::weight::Weight;

/// Canonical image of one successor slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct EdgeKey<K> {
    pub weight: K,
    pub node: Option<NodeRef>,
}

/// Canonical key of a whole node.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct NodeKey<K> {
    pub order: Order,
    pub edges: Box<[EdgeKey<K>]>,
}

impl<K> NodeKey<K> {
    /// Derive the key of `(order, successors)` under the given tolerance.
    pub fn new<W>(order: Order, successors: &Successors<W>, epsilon: f64) -> Self
    where
        W: Weight<Key = K>,
    {
        Self {
            order,
            edges: edge_keys(successors, epsilon),
        }
    }
}

/// Derive the per-slot part of a canonical key.
pub fn edge_keys<W: Weight>(successors: &Successors<W>, epsilon: f64) -> Box<[EdgeKey<W::Key>]> {
    successors
        .iter()
        .map(|e| EdgeKey {
            weight: e.weight.quantize(epsilon),
            node: e.node,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::*;
    use crate::node::Edge;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_noisy_weights_share_key() {
        let a = Successors::from_iter([Edge::terminal(1.0), Edge::terminal(1.0)]);
        let b = Successors::from_iter([Edge::terminal(1.0 + 3e-10), Edge::terminal(1.0)]);

        let ka = NodeKey::new(Order::new(1), &a, 1e-9);
        let kb = NodeKey::new(Order::new(1), &b, 1e-9);
        assert_eq!(ka, kb);
        assert_eq!(hash_of(&ka), hash_of(&kb));
    }

    #[test]
    fn test_order_and_child_distinguish() {
        let child = NodeRef::new(1, 0);
        let a = Successors::from_iter([Edge::terminal(1.0), Edge::terminal(1.0)]);
        let b = Successors::from_iter([Edge::to(1.0, child), Edge::terminal(1.0)]);

        assert_ne!(NodeKey::new(Order::new(1), &a, 1e-9), NodeKey::new(Order::new(2), &a, 1e-9));
        assert_ne!(NodeKey::new(Order::new(1), &a, 1e-9), NodeKey::new(Order::new(1), &b, 1e-9));
    }

    #[test]
    fn test_slot_order_matters() {
        let a = Successors::from_iter([Edge::terminal(1.0), Edge::terminal(0.0)]);
        let b = Successors::from_iter([Edge::terminal(0.0), Edge::terminal(1.0)]);
        assert_ne!(edge_keys(&a, 1e-9), edge_keys(&b, 1e-9));
    }
}
