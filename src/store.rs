//! The node store: entry point for building and reclaiming diagram nodes.
//!
//! All node construction goes through a [`NodeStore`], which owns the unique
//! table and guarantees canonicity: structurally equal nodes (up to weight
//! tolerance) are always the same [`NodeRef`].
//!
//! # Lifecycle
//!
//! 1. **Init**: [`NodeStore::new`] or [`NodeStore::with_config`] creates an
//!    empty table.
//! 2. **Build**: builders call [`NodeStore::get_unique_node`], possibly from
//!    many threads at once when the store is a [`SharedStore`].
//! 3. **Reset**: once construction has quiesced, [`NodeStore::reset`] keeps
//!    the closure of the given roots and frees everything else. It takes
//!    `&mut self`, so no construction can be in flight.
//! 4. **Teardown**: dropping the store frees all nodes.
//!
//! # Examples
//!
//! ```
//! use tdd_rs::node::{Edge, Successors};
//! use tdd_rs::store::SharedStore;
//! use tdd_rs::types::Order;
//!
//! let mut store = SharedStore::<f64>::new();
//!
//! let a = store.get_unique_node(Order::new(1), Successors::from_iter([Edge::terminal(1.0), Edge::terminal(1.0)]));
//! let b = store.get_unique_node(Order::new(1), Successors::from_iter([Edge::terminal(1.0 + 3e-10), Edge::terminal(1.0)]));
//! assert_eq!(a, b);
//! assert_eq!(store.size(a), 2);
//!
//! let roots = store.reset(&[a]);
//! assert_eq!(store.len(), 1);
//! assert_eq!(store.range(roots[0]), 2);
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt::Debug;
use std::marker::PhantomData;

use log::{debug, trace};
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::key::NodeKey;
use crate::lock::TableLock;
use crate::node::{Node, Successors};
use crate::reference::NodeRef;
use crate::table::UniqueTable;
use crate::types::Order;
use crate::weight::{Weight, DEFAULT_EPSILON};

/// Configuration of a [`NodeStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Tolerance used to quantize edge weights.
    pub epsilon: f64,
    /// Number of node slots reserved up front.
    pub capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            capacity: 1024,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(StoreError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}

/// Manager owning the unique table of diagram nodes.
///
/// The lock strategy `L` decides whether the store may be shared between
/// threads; see [`SharedStore`] and [`LocalStore`].
pub struct NodeStore<W: Weight, L = RwLock<UniqueTable<W>>> {
    table: L,
    config: StoreConfig,
    _weight: PhantomData<W>,
}

/// Thread-safe store: lookups share a read lock, inserts are exclusive.
pub type SharedStore<W> = NodeStore<W, RwLock<UniqueTable<W>>>;

/// Single-threaded store without locking. It is `!Sync`, so it cannot be
/// shared between threads by accident.
pub type LocalStore<W> = NodeStore<W, RefCell<UniqueTable<W>>>;

impl<W, L> NodeStore<W, L>
where
    W: Weight,
    L: TableLock<UniqueTable<W>>,
{
    /// Create a store with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: StoreConfig) -> Self {
        Self {
            table: L::new(UniqueTable::new(config.epsilon, config.capacity)),
            config,
            _weight: PhantomData,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    /// Run `f` with shared access to the unique table.
    ///
    /// The guard is held while `f` runs, so `f` must not call back into the
    /// store.
    pub(crate) fn with_table<R>(&self, f: impl FnOnce(&UniqueTable<W>) -> R) -> R {
        self.table.read(f)
    }
}

impl<W, L> Default for NodeStore<W, L>
where
    W: Weight,
    L: TableLock<UniqueTable<W>>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<W, L> Debug for NodeStore<W, L>
where
    W: Weight,
    L: TableLock<UniqueTable<W>>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (generation, nodes) = self.table.read(|t| (t.generation(), t.len()));
        f.debug_struct("NodeStore")
            .field("epsilon", &self.config.epsilon)
            .field("generation", &generation)
            .field("nodes", &nodes)
            .finish()
    }
}

impl<W, L> NodeStore<W, L>
where
    W: Weight,
    L: TableLock<UniqueTable<W>>,
{
    /// Return the canonical node for `(order, successors)`, taking ownership
    /// of the successor list.
    ///
    /// On a hit the list is dropped; on a miss it moves into the new node.
    /// Weights are compared with the store's tolerance, so raw results of
    /// floating-point computations can be passed in directly.
    ///
    /// # Panics
    ///
    /// Panics if a child reference is stale (created before the last reset).
    pub fn get_unique_node(&self, order: Order, successors: Successors<W>) -> NodeRef {
        let key = NodeKey::new(order, &successors, self.config.epsilon);
        self.lookup_or_insert(key, || successors)
    }

    /// Like [`NodeStore::get_unique_node`], but leaves the caller's list
    /// untouched and clones it only on a miss.
    pub fn get_unique_node_by_ref(&self, order: Order, successors: &Successors<W>) -> NodeRef {
        let key = NodeKey::new(order, successors, self.config.epsilon);
        self.lookup_or_insert(key, || successors.clone())
    }

    fn lookup_or_insert(&self, key: NodeKey<W::Key>, make: impl FnOnce() -> Successors<W>) -> NodeRef {
        if let Some(node) = self.table.read(|t| t.find(&key)) {
            trace!("get_unique_node: shared hit ({}) -> {}", key.order, node);
            return node;
        }
        // Another thread may have inserted the key between the two locks;
        // `find_or_insert_with` looks again before inserting.
        self.table.write(|t| t.find_or_insert_with(key, make))
    }

    /// Keep only the nodes reachable from `roots` and free everything else.
    ///
    /// Returns the new references of `roots`, in the same order. All other
    /// references obtained before the reset become stale, and using them
    /// panics.
    ///
    /// # Panics
    ///
    /// Panics if any root is stale or out of range. The table is left
    /// untouched in that case.
    pub fn reset(&mut self, roots: &[NodeRef]) -> Vec<NodeRef> {
        let table = self.table.get_mut();
        for &root in roots {
            table.check_ref(root);
        }

        let old = std::mem::replace(table, UniqueTable::new(self.config.epsilon, 0));
        let (fresh, roots) = old.rebuild(roots, self.config.capacity);
        *table = fresh;
        roots
    }

    /// Free all nodes.
    pub fn clear(&mut self) {
        self.reset(&[]);
    }
}

impl<W, L> NodeStore<W, L>
where
    W: Weight,
    L: TableLock<UniqueTable<W>>,
{
    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.table.read(|t| t.len())
    }

    pub fn is_empty(&self) -> bool {
        self.table.read(|t| t.is_empty())
    }

    /// Current table generation; bumped by every reset.
    pub fn generation(&self) -> u32 {
        self.table.read(|t| t.generation())
    }

    /// Check whether `node` is a live reference of the current generation.
    pub fn contains(&self, node: NodeRef) -> bool {
        self.table.read(|t| t.contains(node))
    }

    /// Run `f` on the node behind `node` without cloning it. Same guard rule
    /// as [`NodeStore::with_table`].
    pub(crate) fn with_node<R>(&self, node: NodeRef, f: impl FnOnce(&Node<W>) -> R) -> R {
        self.table.read(|t| f(t.node(node)))
    }

    /// Get a copy of the node behind `node`.
    pub fn node(&self, node: NodeRef) -> Node<W> {
        self.with_node(node, |n| n.clone())
    }

    pub fn order(&self, node: NodeRef) -> Order {
        self.with_node(node, |n| n.order())
    }

    pub fn range(&self, node: NodeRef) -> usize {
        self.with_node(node, |n| n.range())
    }

    pub fn successors(&self, node: NodeRef) -> Successors<W> {
        self.with_node(node, |n| n.successors().clone())
    }

    pub fn children(&self, node: NodeRef) -> Vec<NodeRef> {
        self.with_node(node, |n| n.children().collect())
    }

    /// All nodes reachable from `roots`, the terminal excluded.
    pub fn descendants(&self, roots: impl IntoIterator<Item = NodeRef>) -> HashSet<NodeRef> {
        self.table.read(|t| t.descendants(roots))
    }

    /// Number of distinct vertices reachable from `node`, counting the
    /// terminal once.
    pub fn size(&self, node: NodeRef) -> usize {
        let size = self.table.read(|t| t.size(node));
        debug!("size({}) -> {}", node, size);
        size
    }

    /// Number of live nodes per order, skipping empty orders.
    pub fn level_sizes(&self) -> Vec<(Order, usize)> {
        self.table.read(|t| t.level_sizes())
    }

    /// Verify canonicity and structural invariants of the whole table.
    pub fn check(&self) -> Result<(), StoreError> {
        self.table.read(|t| t.check())
    }
}
