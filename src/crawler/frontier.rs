//! Frontier of pending addresses for one crawl
//!
//! The frontier is a stack: the address processed next is always the one
//! pushed most recently. Links discovered on a page are therefore explored
//! before siblings discovered earlier, which gives a depth-first traversal.
//! Swapping this for a FIFO queue changes the crawl order.
//!
//! An address is pending at most once. Pushing an address that is already
//! pending moves it to the top, exactly where a second copy would have been
//! popped from, so the traversal order is unchanged while the address is
//! only ever locked once per crawl.

use crate::address::Address;
use std::collections::HashSet;

/// Pending addresses of a single crawl, popped in last-in-first-out order
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    stack: Vec<Address>,
    pending: HashSet<Address>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding only `seed`
    pub fn seeded(seed: Address) -> Self {
        let mut frontier = Self::new();
        frontier.push(seed);
        frontier
    }

    /// Puts an address on top of the frontier
    pub fn push(&mut self, address: Address) {
        if !self.pending.insert(address.clone()) {
            self.stack.retain(|pending| pending != &address);
        }
        self.stack.push(address);
    }

    /// Removes and returns the most recently pushed address
    ///
    /// Callers check [`Frontier::is_empty`] first; on an empty frontier this
    /// returns `None`.
    pub fn pop_next(&mut self) -> Option<Address> {
        let address = self.stack.pop()?;
        self.pending.remove(&address);
        Some(address)
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Returns the number of pending addresses
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns whether `address` is waiting to be processed
    pub fn contains(&self, address: &Address) -> bool {
        self.pending.contains(address)
    }
}
