//! Per-order subtable for diagram nodes.
//!
//! The unique table keeps nodes in a flat arena and indexes them through one
//! subtable per order:
//!
//! ```text
//! subtables[0] → nodes of order 0
//! subtables[1] → nodes of order 1
//! subtables[2] → nodes of order 2
//! ...
//! ```
//!
//! Since all nodes in a subtable share the same order, the order is not part
//! of the subtable key: only the per-slot [`EdgeKey`]s are hashed.

use std::collections::HashMap;

use crate::key::EdgeKey;
use crate::reference::NodeRef;
use crate::types::Order;

/// A subtable storing the canonical nodes of a single order.
#[derive(Debug, Clone)]
pub struct Subtable<K> {
    /// The order of all nodes in this subtable.
    pub order: Order,

    /// Map from successor key to the canonical node.
    nodes: HashMap<Box<[EdgeKey<K>]>, NodeRef>,
}

impl<K> Subtable<K>
where
    K: Copy + Eq + std::hash::Hash,
{
    /// Create a new empty subtable for the given order.
    pub fn new(order: Order) -> Self {
        Self {
            order,
            nodes: HashMap::new(),
        }
    }

    /// Look up a node by its successor key.
    pub fn find(&self, key: &[EdgeKey<K>]) -> Option<NodeRef> {
        self.nodes.get(key).copied()
    }

    /// Insert a node into the subtable.
    ///
    /// Returns the previously indexed node, if any. The unique table never
    /// overwrites, so a `Some` here means canonicity was already broken.
    pub fn insert(&mut self, key: Box<[EdgeKey<K>]>, node: NodeRef) -> Option<NodeRef> {
        self.nodes.insert(key, node)
    }

    /// Get the number of nodes in this subtable.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the subtable is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in this subtable.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.nodes.values().copied()
    }
}
