use std::ops::Index;

use crate::reference::NodeRef;
use crate::types::Order;
use crate::weight::Weight;

/// A weighted edge to a successor.
///
/// `node == None` is the terminal leaf, which is never allocated.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<W> {
    pub weight: W,
    pub node: Option<NodeRef>,
}

impl<W> Edge<W> {
    pub fn new(weight: W, node: Option<NodeRef>) -> Self {
        Self { weight, node }
    }

    /// Edge into the terminal leaf.
    pub fn terminal(weight: W) -> Self {
        Self { weight, node: None }
    }

    /// Edge into an allocated node.
    pub fn to(weight: W, node: NodeRef) -> Self {
        Self {
            weight,
            node: Some(node),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.node.is_none()
    }
}

/// Fixed-length list of weighted successors, one per value of the index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Successors<W>(Vec<Edge<W>>);

impl<W> Successors<W> {
    pub fn new(edges: Vec<Edge<W>>) -> Self {
        Self(edges)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Edge<W>> {
        self.0.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge<W>> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Edge<W>] {
        &self.0
    }

    /// Non-terminal children, in slot order (duplicates included).
    pub fn children(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.0.iter().filter_map(|e| e.node)
    }

    pub fn into_vec(self) -> Vec<Edge<W>> {
        self.0
    }
}

impl<W> Index<usize> for Successors<W> {
    type Output = Edge<W>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<W> From<Vec<Edge<W>>> for Successors<W> {
    fn from(edges: Vec<Edge<W>>) -> Self {
        Self(edges)
    }
}

impl<W> FromIterator<Edge<W>> for Successors<W> {
    fn from_iter<I: IntoIterator<Item = Edge<W>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<W> IntoIterator for Successors<W> {
    type Item = Edge<W>;
    type IntoIter = std::vec::IntoIter<Edge<W>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, W> IntoIterator for &'a Successors<W> {
    type Item = &'a Edge<W>;
    type IntoIter = std::slice::Iter<'a, Edge<W>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// An immutable diagram vertex.
///
/// Nodes are only ever created by the unique table, which owns them.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<W> {
    order: Order,
    successors: Successors<W>,
}

impl<W: Weight> Node<W> {
    pub(crate) fn new(order: Order, successors: Successors<W>) -> Self {
        Self { order, successors }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// Number of values of this node's index.
    pub fn range(&self) -> usize {
        self.successors.len()
    }

    pub fn successors(&self) -> &Successors<W> {
        &self.successors
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.successors.children()
    }

    pub(crate) fn into_parts(self) -> (Order, Successors<W>) {
        (self.order, self.successors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successors() {
        let child = NodeRef::new(4, 0);
        let succ: Successors<f64> = vec![Edge::terminal(1.0), Edge::to(0.5, child), Edge::to(0.25, child)].into();

        assert_eq!(succ.len(), 3);
        assert!(succ[0].is_terminal());
        assert_eq!(succ[1].node, Some(child));
        assert_eq!(succ.children().collect::<Vec<_>>(), vec![child, child]);
    }

    #[test]
    fn test_node_range() {
        let node = Node::new(Order::new(2), Successors::from_iter([Edge::terminal(1.0), Edge::terminal(0.0)]));
        assert_eq!(node.order(), Order::new(2));
        assert_eq!(node.range(), 2);
        assert_eq!(node.children().count(), 0);
    }
}
