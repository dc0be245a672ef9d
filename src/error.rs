use thiserror::Error;

use crate::reference::NodeRef;
use crate::types::Order;

/// Errors reported by the node store.
///
/// Node construction itself never fails; these come from configuration
/// validation and from the internal consistency check.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("epsilon must be finite and positive, got {0}")]
    InvalidEpsilon(f64),

    #[error("canonicity violated: {duplicate} has the same key as {canonical}")]
    DuplicateNode { canonical: NodeRef, duplicate: NodeRef },

    #[error("node {0} is not indexed under its own key")]
    UnindexedNode(NodeRef),

    #[error("node {node} points to {child}, which is not a live node of this table")]
    DanglingChild { node: NodeRef, child: NodeRef },

    #[error("node {node} at {order} points to {child} at {child_order}; orders must strictly increase")]
    OrderViolation {
        node: NodeRef,
        order: Order,
        child: NodeRef,
        child_order: Order,
    },
}
