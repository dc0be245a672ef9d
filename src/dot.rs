//! Diagram to DOT (Graphviz) conversion.
//!
//! The generated DOT output follows these conventions:
//! - The **terminal** is a single square at the bottom (sink rank)
//! - **Nodes** are circles labelled with their order, grouped by order
//! - **Edges** are labelled with the slot index and the weight
//! - **Root markers** are rectangles at the top (source rank)
//!
//! # Examples
//!
//! ```
//! use tdd_rs::node::{Edge, Successors};
//! use tdd_rs::store::SharedStore;
//! use tdd_rs::types::Order;
//!
//! let store = SharedStore::<f64>::new();
//! let f = store.get_unique_node(Order::new(0), Successors::from_iter([Edge::terminal(1.0), Edge::terminal(0.5)]));
//!
//! let dot = store.to_dot(&[f]).unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::lock::TableLock;
use crate::reference::NodeRef;
use crate::store::NodeStore;
use crate::table::UniqueTable;
use crate::types::Order;
use crate::weight::Weight;

/// Configuration options for DOT output generation.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for diagram nodes (default: "circle")
    pub node_shape: &'static str,
    /// Shape for the terminal (default: "square")
    pub terminal_shape: &'static str,
    /// Shape for root markers (default: "rect")
    pub root_shape: &'static str,
    /// Style for weighted edges (default: "solid")
    pub edge_style: &'static str,
    /// Digits after the decimal point in weight labels; `None` prints weights as-is (default: 2)
    pub precision: Option<usize>,
    /// Whether to prefix weight labels with the slot index (default: true)
    pub show_slots: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            terminal_shape: "square",
            root_shape: "rect",
            edge_style: "solid",
            precision: Some(2),
            show_slots: true,
        }
    }
}

impl<W, L> NodeStore<W, L>
where
    W: Weight,
    L: TableLock<UniqueTable<W>>,
{
    /// Converts the diagrams rooted at `roots` to DOT format.
    ///
    /// Shared nodes are emitted once, even when reachable from several roots.
    pub fn to_dot(&self, roots: &[NodeRef]) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(roots, &DotConfig::default())
    }

    /// Converts the diagrams rooted at `roots` to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, roots: &[NodeRef], config: &DotConfig) -> Result<String, std::fmt::Error> {
        self.with_table(|table| render(table, roots, config))
    }
}

fn render<W: Weight>(table: &UniqueTable<W>, roots: &[NodeRef], config: &DotConfig) -> Result<String, std::fmt::Error> {
    let mut dot = String::new();
    writeln!(dot, "digraph {{")?;
    writeln!(dot, "node [shape={}];", config.node_shape)?;

    // Terminal
    writeln!(dot, "{{ rank=sink")?;
    writeln!(dot, "T [shape={}, label=\"1\"];", config.terminal_shape)?;
    writeln!(dot, "}}")?;

    // Group nodes by order for ranking, sorted for stable output
    let mut levels = BTreeMap::<Order, Vec<NodeRef>>::new();
    for node in table.descendants(roots.iter().copied()) {
        levels.entry(table.node(node).order()).or_default().push(node);
    }
    for nodes in levels.values_mut() {
        nodes.sort();
    }

    for (order, nodes) in &levels {
        writeln!(dot, "{{ rank=same")?;
        for node in nodes {
            writeln!(dot, "n{} [label=\"{}\"];", node.id(), order.get())?;
        }
        writeln!(dot, "}}")?;
    }

    for node in levels.values().flatten() {
        for (slot, edge) in table.node(*node).successors().iter().enumerate() {
            let target = match edge.node {
                Some(child) => format!("n{}", child.id()),
                None => "T".to_string(),
            };
            let weight = match config.precision {
                Some(p) => format!("{:.*}", p, edge.weight),
                None => edge.weight.to_string(),
            };
            let label = if config.show_slots {
                format!("{}: {}", slot, weight)
            } else {
                weight
            };
            writeln!(
                dot,
                "n{} -> {} [style={}, label=\"{}\"];",
                node.id(),
                target,
                config.edge_style,
                label
            )?;
        }
    }

    // Root markers
    writeln!(dot, "{{ rank=source")?;
    for (i, root) in roots.iter().enumerate() {
        writeln!(dot, "r{} [shape={}, label=\"{}\"];", i, config.root_shape, root)?;
    }
    writeln!(dot, "}}")?;
    for (i, root) in roots.iter().enumerate() {
        writeln!(dot, "r{} -> n{};", i, root.id())?;
    }

    writeln!(dot, "}}")?;
    Ok(dot)
}
