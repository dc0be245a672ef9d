//! Debug utilities for inspecting diagram structure.
//!
//! This module provides helpers for exploring and debugging node stores.
//! These are primarily useful in tests and during development.

use std::collections::HashSet;
use std::fmt::Write;

use crate::lock::TableLock;
use crate::node::{Node, Successors};
use crate::reference::NodeRef;
use crate::store::NodeStore;
use crate::table::UniqueTable;
use crate::types::Order;
use crate::weight::Weight;

/// Detailed information about a single node.
#[derive(Debug, Clone)]
pub struct NodeInfo<W> {
    /// The reference to this node
    pub node: NodeRef,
    /// Order of the node's index
    pub order: Order,
    /// Weighted successors, one per index value
    pub successors: Successors<W>,
}

impl<W: Weight> NodeInfo<W> {
    fn new(node: NodeRef, content: &Node<W>) -> Self {
        Self {
            node,
            order: content.order(),
            successors: content.successors().clone(),
        }
    }
}

impl<W: Weight> std::fmt::Display for NodeInfo<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(order={}, [", self.node, self.order)?;
        for (i, edge) in self.successors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match edge.node {
                Some(child) => write!(f, "{} -> {}", edge.weight, child)?,
                None => write!(f, "{} -> T", edge.weight)?,
            }
        }
        write!(f, "])")
    }
}

/// All nodes of a diagram, each listed once.
#[derive(Debug, Clone)]
pub struct DiagramTree<W> {
    pub root: NodeRef,
    pub nodes: Vec<NodeInfo<W>>,
}

impl<W: Weight> std::fmt::Display for DiagramTree<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Diagram (root = {}):", self.root)?;
        for node in &self.nodes {
            writeln!(f, "  {}", node)?;
        }
        Ok(())
    }
}

impl<W, L> NodeStore<W, L>
where
    W: Weight,
    L: TableLock<UniqueTable<W>>,
{
    /// Get detailed information about a single node.
    pub fn node_info(&self, node: NodeRef) -> NodeInfo<W> {
        self.with_node(node, |content| NodeInfo::new(node, content))
    }

    /// Get every node reachable from `root`, each once, sorted by order.
    pub fn debug_tree(&self, root: NodeRef) -> DiagramTree<W> {
        let mut nodes = self.with_table(|table| {
            let mut nodes = Vec::new();
            let mut visited = HashSet::new();
            let mut stack = vec![root];

            while let Some(node) = stack.pop() {
                if !visited.insert(node) {
                    continue;
                }
                let content = table.node(node);
                nodes.push(NodeInfo::new(node, content));
                stack.extend(content.children());
            }
            nodes
        });

        nodes.sort_by_key(|n| (n.order, n.node));
        DiagramTree { root, nodes }
    }

    /// Compact one-line-per-node representation of a diagram.
    pub fn debug_string(&self, root: NodeRef) -> String {
        let mut result = String::new();
        let tree = self.debug_tree(root);

        writeln!(&mut result, "Diagram {} (size={}):", root, tree.nodes.len() + 1).unwrap();
        for node in &tree.nodes {
            writeln!(&mut result, "  {}", node).unwrap();
        }
        result
    }

    /// Indented dump of the diagram rooted at `root`.
    ///
    /// Every occurrence of a shared child is expanded again, so the output
    /// grows with the number of paths rather than the number of nodes.
    pub fn dump(&self, root: NodeRef) -> String {
        let mut result = String::new();
        self.with_table(|table| dump_node(table, root, &mut result)).unwrap();
        result
    }

    /// Print [`NodeStore::dump`] to stdout.
    pub fn print(&self, root: NodeRef) {
        print!("{}", self.dump(root));
    }

    /// Dump complete store state for debugging.
    pub fn dump_state(&self) -> String {
        let mut result = String::new();

        writeln!(&mut result, "=== Store State ===").unwrap();
        writeln!(&mut result, "Generation: {}", self.generation()).unwrap();
        writeln!(&mut result, "Epsilon: {:e}", self.epsilon()).unwrap();
        writeln!(&mut result, "Nodes: count={}", self.len()).unwrap();

        writeln!(&mut result, "Nodes by order:").unwrap();
        for (order, count) in self.level_sizes() {
            writeln!(&mut result, "  {}: {}", order, count).unwrap();
        }

        result
    }
}

fn dump_node<W: Weight>(table: &UniqueTable<W>, root: NodeRef, out: &mut String) -> std::fmt::Result {
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        let content = table.node(node);
        let depth = content.order().index();
        let indent = " ".repeat(depth);

        writeln!(out, "{}=======", "-".repeat(depth))?;
        writeln!(out, "{}|node: {}", indent, node)?;
        writeln!(out, "{}|order: {}", indent, content.order().get())?;
        writeln!(out, "{}|successors:", indent)?;
        for (j, edge) in content.successors().iter().enumerate() {
            writeln!(out, "{}|  {} weight: {}", indent, j, edge.weight)?;
            match edge.node {
                Some(child) => writeln!(out, "{}|  {} node: {}", indent, j, child)?,
                None => writeln!(out, "{}|  {} node: terminal", indent, j)?,
            }
        }

        // Pushed in reverse so children come out in slot order.
        let children: Vec<NodeRef> = content.children().collect();
        stack.extend(children.into_iter().rev());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::node::Edge;
    use crate::store::LocalStore;

    fn diamond(store: &LocalStore<f64>) -> (NodeRef, NodeRef) {
        let leaf = store.get_unique_node(Order::new(2), Successors::from_iter([Edge::terminal(1.0), Edge::terminal(-1.0)]));
        let left = store.get_unique_node(Order::new(1), Successors::from_iter([Edge::to(1.0, leaf), Edge::terminal(0.0)]));
        let right = store.get_unique_node(Order::new(1), Successors::from_iter([Edge::terminal(0.0), Edge::to(1.0, leaf)]));
        let root = store.get_unique_node(Order::new(0), Successors::from_iter([Edge::to(0.5, left), Edge::to(0.5, right)]));
        (root, leaf)
    }

    #[test]
    fn test_node_info() {
        let store = LocalStore::<f64>::new();
        let (_, leaf) = diamond(&store);

        let info = store.node_info(leaf);
        assert_eq!(info.order, Order::new(2));
        assert_eq!(info.successors.len(), 2);
        assert_eq!(info.to_string(), format!("{}(order=O2, [1 -> T, -1 -> T])", leaf));
    }

    #[test]
    fn test_debug_tree_lists_shared_once() {
        let store = LocalStore::<f64>::new();
        let (root, leaf) = diamond(&store);

        let tree = store.debug_tree(root);
        assert_eq!(tree.root, root);
        assert_eq!(tree.nodes.len(), 4);
        assert_eq!(tree.nodes[0].node, root);
        assert_eq!(tree.nodes[3].node, leaf);
    }

    #[test]
    fn test_dump_expands_shared_children() {
        let store = LocalStore::<f64>::new();
        let (root, leaf) = diamond(&store);

        let dump = store.dump(root);
        assert_eq!(dump.matches("=======").count(), 5);
        assert_eq!(dump.matches(&format!("|node: {}", leaf)).count(), 2);
        assert!(dump.contains("|  0 node: terminal"));

        // Pre-order, children in slot order.
        let nodes: Vec<&str> = dump.lines().filter(|l| l.trim_start().starts_with("|node:")).collect();
        assert_eq!(nodes.len(), 5);
        assert!(nodes[0].ends_with(&root.to_string()));
        assert!(nodes[2].ends_with(&leaf.to_string()));
        assert!(nodes[4].ends_with(&leaf.to_string()));
    }

    #[test]
    fn test_debug_string_and_state() {
        let store = LocalStore::<f64>::new();
        let (root, _) = diamond(&store);

        let s = store.debug_string(root);
        assert!(s.contains("size=5"), "Expected size=5 in: {}", s);

        let state = store.dump_state();
        assert!(state.contains("Nodes: count=4"), "unexpected: {}", state);
        assert!(state.contains("O1: 2"), "unexpected: {}", state);
    }
}
