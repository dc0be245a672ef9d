//! The unique table: node arena plus per-order hash index.
//!
//! The table is the exclusive owner of every node it vends. Nodes are
//! appended to a flat arena and never mutated or individually freed; the only
//! way memory is reclaimed is [`UniqueTable::rebuild`], which copies the
//! closure of a root set into a fresh table and drops the old arena.

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, info, trace};

use crate::error::StoreError;
use crate::key::NodeKey;
use crate::node::{Edge, Node, Successors};
use crate::reference::NodeRef;
use crate::subtable::Subtable;
use crate::types::Order;
use crate::weight::Weight;

pub struct UniqueTable<W: Weight> {
    nodes: Vec<Node<W>>,
    subtables: BTreeMap<Order, Subtable<W::Key>>,
    generation: u32,
    epsilon: f64,
}

impl<W: Weight> UniqueTable<W> {
    /// Create an empty table with room for `capacity` nodes.
    pub fn new(epsilon: f64, capacity: usize) -> Self {
        Self::with_generation(epsilon, capacity, 0)
    }

    fn with_generation(epsilon: f64, capacity: usize, generation: u32) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            subtables: BTreeMap::new(),
            generation,
            epsilon,
        }
    }
}

impl<W: Weight> UniqueTable<W> {
    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Check whether `node` refers to a live node of this table.
    pub fn contains(&self, node: NodeRef) -> bool {
        node.generation() == self.generation && node.index() < self.nodes.len()
    }

    pub(crate) fn check_ref(&self, node: NodeRef) {
        assert_eq!(
            node.generation(),
            self.generation,
            "Stale node reference {} from generation {} (table is at generation {})",
            node,
            node.generation(),
            self.generation
        );
        assert!(node.index() < self.nodes.len(), "Node reference {} is out of range", node);
    }

    /// Get the node behind a reference.
    ///
    /// # Panics
    ///
    /// Panics if the reference is stale (from before a reset) or out of range.
    pub fn node(&self, node: NodeRef) -> &Node<W> {
        self.check_ref(node);
        &self.nodes[node.index()]
    }

    /// Iterate over all live nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeRef, &Node<W>)> + '_ {
        let generation = self.generation;
        self.nodes
            .iter()
            .enumerate()
            .map(move |(i, node)| (NodeRef::new(i as u32, generation), node))
    }

    /// Number of live nodes per order, skipping empty orders.
    pub fn level_sizes(&self) -> Vec<(Order, usize)> {
        self.subtables
            .values()
            .filter(|st| !st.is_empty())
            .map(|st| (st.order, st.len()))
            .collect()
    }

    /// Derive the canonical key of `(order, successors)` under this table's tolerance.
    pub fn key(&self, order: Order, successors: &Successors<W>) -> NodeKey<W::Key> {
        NodeKey::new(order, successors, self.epsilon)
    }

    /// Look up the canonical node for `key`.
    pub fn find(&self, key: &NodeKey<W::Key>) -> Option<NodeRef> {
        self.subtables.get(&key.order)?.find(&key.edges)
    }

    /// Return the canonical node for `key`, inserting one built by `make` on
    /// a miss. `make` is not called on a hit.
    pub fn find_or_insert_with(&mut self, key: NodeKey<W::Key>, make: impl FnOnce() -> Successors<W>) -> NodeRef {
        if let Some(node) = self.find(&key) {
            trace!("unique: hit ({}, range = {}) -> {}", key.order, key.edges.len(), node);
            return node;
        }
        self.insert(key, make())
    }

    fn insert(&mut self, key: NodeKey<W::Key>, successors: Successors<W>) -> NodeRef {
        assert_eq!(key.edges.len(), successors.len(), "Key does not match successor list");
        for child in successors.children() {
            self.check_ref(child);
        }
        assert!(self.nodes.len() < u32::MAX as usize, "Unique table is full");

        let NodeKey { order, edges } = key;
        let node = NodeRef::new(self.nodes.len() as u32, self.generation);
        debug!("mk(order = {}, range = {}) -> {}", order, successors.len(), node);
        self.nodes.push(Node::new(order, successors));

        let previous = self.subtable_mut(order).insert(edges, node);
        debug_assert!(previous.is_none(), "Overwrote canonical node {:?}", previous);
        node
    }

    fn subtable_mut(&mut self, order: Order) -> &mut Subtable<W::Key> {
        self.subtables.entry(order).or_insert_with(|| Subtable::new(order))
    }

    /// Collect all nodes reachable from `roots` (the terminal is not included).
    pub fn descendants(&self, roots: impl IntoIterator<Item = NodeRef>) -> HashSet<NodeRef> {
        let mut visited = HashSet::new();
        let mut stack = Vec::from_iter(roots);

        while let Some(node) = stack.pop() {
            if visited.insert(node) {
                stack.extend(self.node(node).children());
            }
        }

        visited
    }

    /// Count distinct vertices reachable from `node`, the terminal included.
    pub fn size(&self, node: NodeRef) -> usize {
        self.descendants([node]).len() + 1
    }

    /// Rebuild the table keeping only the closure of `roots`.
    ///
    /// Returns the fresh table (one generation later, with room for at least
    /// `capacity` nodes) and the remapped roots, in the same order as given.
    /// Every node of `self` not reached from the roots is dropped together
    /// with the old arena.
    ///
    /// # Panics
    ///
    /// Panics if any root is stale or out of range.
    pub fn rebuild(self, roots: &[NodeRef], capacity: usize) -> (Self, Vec<NodeRef>) {
        // A child is always allocated before its parent, so ascending arena
        // order visits every child before the nodes pointing to it.
        let mut live = Vec::from_iter(self.descendants(roots.iter().copied()));
        live.sort_unstable();

        let old_generation = self.generation;
        let old_len = self.nodes.len();
        let mut fresh = Self::with_generation(self.epsilon, capacity.max(live.len()), old_generation.wrapping_add(1));
        debug!("Rebuilding unique table from {} roots ({} of {} nodes live)", roots.len(), live.len(), old_len);

        let mut old: Vec<Option<Node<W>>> = self.nodes.into_iter().map(Some).collect();
        let mut remapped = HashMap::with_capacity(live.len());
        for node in live {
            let Some(content) = old[node.index()].take() else {
                panic!("Node {} visited twice while rebuilding the unique table", node);
            };
            let (order, successors) = content.into_parts();

            let successors: Successors<W> = successors
                .into_iter()
                .map(|edge| {
                    let child = edge.node.map(|child| remapped[&child]);
                    Edge::new(edge.weight, child)
                })
                .collect();

            let key = fresh.key(order, &successors);
            let res = fresh.find_or_insert_with(key, || successors);
            trace!("remap: {} -> {}", node, res);
            remapped.insert(node, res);
        }

        let new_roots = roots.iter().map(|root| remapped[root]).collect();

        let freed = old.iter().filter(|node| node.is_some()).count();
        debug_assert_eq!(freed + remapped.len(), old_len);
        info!(
            "Reset: kept {} of {} nodes, freed {}, generation {} -> {}",
            fresh.len(),
            old_len,
            freed,
            old_generation,
            fresh.generation
        );

        (fresh, new_roots)
    }

    /// Verify canonicity and structural invariants of every live node.
    pub fn check(&self) -> Result<(), StoreError> {
        for (node, content) in self.iter() {
            for child in content.children() {
                if !self.contains(child) {
                    return Err(StoreError::DanglingChild { node, child });
                }
                let child_order = self.nodes[child.index()].order();
                if child_order <= content.order() {
                    return Err(StoreError::OrderViolation {
                        node,
                        order: content.order(),
                        child,
                        child_order,
                    });
                }
            }

            let key = self.key(content.order(), content.successors());
            match self.find(&key) {
                Some(found) if found == node => {}
                Some(canonical) => return Err(StoreError::DuplicateNode { canonical, duplicate: node }),
                None => return Err(StoreError::UnindexedNode(node)),
            }
        }
        Ok(())
    }
}
