//! Type-safe wrapper for node orders.
//!
//! The order of a node is the position of its tensor index in the global
//! variable ordering. Children always sit at strictly greater orders; the
//! terminal has no order at all.
use std::fmt;

/// A position in the variable ordering (0-indexed).
///
/// # Invariants
///
/// - Order 0 is the topmost index (closest to the root)
/// - Orders increase downward toward the terminal
/// - Along every edge the child order is strictly greater than the parent order
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Order(u32);

impl Order {
    /// Creates a new order with the given index.
    pub const fn new(index: u32) -> Self {
        Order(index)
    }

    /// Returns the raw order as a `u32`.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the raw order as a `usize`, suitable for indexing.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the next order down (index + 1).
    pub fn next(self) -> Self {
        Order(self.0 + 1)
    }

    /// Returns the previous order up (index - 1), or None if at order 0.
    pub fn prev(self) -> Option<Self> {
        self.0.checked_sub(1).map(Order)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "O{}", self.0)
    }
}

impl From<u32> for Order {
    fn from(index: u32) -> Self {
        Order(index)
    }
}

impl From<Order> for u32 {
    fn from(order: Order) -> Self {
        order.0
    }
}
