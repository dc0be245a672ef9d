//! Locking strategies for the unique table.
//!
//! The get-or-create protocol is "look up, and insert on a miss". Two callers
//! racing on the same key must never both observe a miss and both insert, so
//! the store runs the protocol through a [`TableLock`]:
//!
//! - [`parking_lot::RwLock`]: lookups share a read lock; a miss takes the
//!   write lock and repeats the lookup before inserting. The store is `Sync`.
//! - [`std::cell::RefCell`]: no synchronization at all. The store is `!Sync`,
//!   so the compiler enforces that only one thread ever constructs nodes.

use std::cell::RefCell;

use parking_lot::RwLock;

/// Interior-mutability strategy wrapping the unique table.
pub trait TableLock<T> {
    fn new(value: T) -> Self;

    /// Run `f` with shared access.
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R;

    /// Run `f` with exclusive access.
    fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;

    /// Exclusive access through a unique borrow, no locking needed.
    fn get_mut(&mut self) -> &mut T;
}

impl<T> TableLock<T> for RwLock<T> {
    fn new(value: T) -> Self {
        RwLock::new(value)
    }

    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*RwLock::read(self))
    }

    fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut *RwLock::write(self))
    }

    fn get_mut(&mut self) -> &mut T {
        RwLock::get_mut(self)
    }
}

impl<T> TableLock<T> for RefCell<T> {
    fn new(value: T) -> Self {
        RefCell::new(value)
    }

    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.borrow())
    }

    fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut *self.borrow_mut())
    }

    fn get_mut(&mut self) -> &mut T {
        RefCell::get_mut(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump<L: TableLock<Vec<u32>>>(lock: &L) -> usize {
        lock.write(|v| v.push(1));
        lock.read(|v| v.len())
    }

    #[test]
    fn test_rwlock_strategy() {
        let mut lock = <RwLock<Vec<u32>> as TableLock<_>>::new(vec![]);
        assert_eq!(bump(&lock), 1);
        TableLock::get_mut(&mut lock).clear();
        assert_eq!(TableLock::read(&lock, |v| v.len()), 0);
    }

    #[test]
    fn test_refcell_strategy() {
        let lock = <RefCell<Vec<u32>> as TableLock<_>>::new(vec![7]);
        assert_eq!(bump(&lock), 2);
    }
}
