//! # tdd-rs: the node layer of weighted decision diagrams
//!
//! **`tdd-rs`** provides node identity and storage for weighted decision
//! diagrams (BDD/ZDD-style DAGs whose edges carry real or complex weights),
//! as used to represent large tensors compactly.
//!
//! ## Canonicity
//!
//! Every node is created through a hash-consing **unique table**. Two requests
//! with the same order, the same children and weights equal up to a fixed
//! tolerance always yield the *same* [`NodeRef`][crate::reference::NodeRef].
//! Structural equality of diagrams therefore collapses to reference equality.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: all nodes live in a [`NodeStore`][crate::store::NodeStore] and are addressed through lightweight `NodeRef` handles.
//! - **Epsilon-Tolerant Keys**: weights are quantized onto an `epsilon` grid, so hashing and equality never disagree.
//! - **Concurrent Construction**: [`SharedStore`][crate::store::SharedStore] lets many threads build nodes at once; [`LocalStore`][crate::store::LocalStore] skips locking entirely.
//! - **Root-Based Collection**: [`reset`][crate::store::NodeStore::reset] rebuilds the table from a root set and frees everything else.
//!
//! ## Basic Usage
//!
//! ```rust
//! use tdd_rs::node::{Edge, Successors};
//! use tdd_rs::store::SharedStore;
//! use tdd_rs::types::Order;
//!
//! // 1. Initialize the store
//! let mut store = SharedStore::<f64>::new();
//!
//! // 2. Build a node just above the terminal
//! let leaf = store.get_unique_node(Order::new(1), Successors::from_iter([Edge::terminal(1.0), Edge::terminal(-1.0)]));
//!
//! // 3. Share it from a parent
//! let root = store.get_unique_node(Order::new(0), Successors::from_iter([Edge::to(0.5, leaf), Edge::to(0.5, leaf)]));
//! assert_eq!(store.size(root), 3); // root, leaf and the terminal
//!
//! // 4. Drop everything not reachable from `root`
//! let roots = store.reset(&[root]);
//! assert_eq!(store.size(roots[0]), 3);
//! ```
//!
//! ## Core Components
//!
//! - **[`store`]**: the [`NodeStore`][crate::store::NodeStore] manager and its configuration.
//! - **[`table`]**: the unique table and the reachability collector.
//! - **[`weight`]**: the [`Weight`][crate::weight::Weight] trait and its quantization.
//! - **[`dot`]**: utilities for visualizing diagrams using Graphviz.

pub mod debug;
pub mod dot;
pub mod error;
pub mod key;
pub mod lock;
pub mod node;
pub mod reference;
pub mod store;
pub mod subtable;
pub mod table;
pub mod types;
pub mod weight;
