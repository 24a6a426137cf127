//! In-process lock store
//!
//! Keeps the marker board in a map behind a mutex. Besides the current state
//! it records every write and read so callers can inspect the exact sequence
//! of operations a crawl performed. Failures can be armed per operation to
//! simulate losing the backend.

use crate::address::Address;
use crate::state::LockState;
use crate::store::traits::{LockStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    states: HashMap<Address, LockState>,
    writes: Vec<(Address, LockState)>,
    reads: Vec<Address>,
    fail_writes_of: Option<LockState>,
    fail_reads: bool,
}

/// Lock store kept entirely in memory
///
/// Clones share the same board.
#[derive(Debug, Clone, Default)]
pub struct MemoryLockStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryLockStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `states`
    ///
    /// Pre-populated entries are not recorded as writes.
    pub fn with_states<I, A>(states: I) -> Self
    where
        I: IntoIterator<Item = (A, LockState)>,
        A: Into<Address>,
    {
        let store = Self::new();
        {
            let mut inner = store.inspect();
            for (address, state) in states {
                inner.states.insert(address.into(), state);
            }
        }
        store
    }

    /// Makes every subsequent write of `state` fail
    pub fn fail_writes_of(&self, state: LockState) {
        self.inspect().fail_writes_of = Some(state);
    }

    /// Makes every subsequent read fail
    pub fn fail_reads(&self) {
        self.inspect().fail_reads = true;
    }

    /// Returns the current state of `address`, if any
    pub fn state_of(&self, address: &str) -> Option<LockState> {
        self.inspect().states.get(&Address::from(address)).copied()
    }

    /// Returns every write in the order it happened
    pub fn writes(&self) -> Vec<(Address, LockState)> {
        self.inspect().writes.clone()
    }

    /// Returns the sequence of states written for `address`
    pub fn writes_for(&self, address: &str) -> Vec<LockState> {
        self.inspect()
            .writes
            .iter()
            .filter(|(written, _)| written.as_str() == address)
            .map(|(_, state)| *state)
            .collect()
    }

    /// Returns every address that was read, in order
    pub fn reads(&self) -> Vec<Address> {
        self.inspect().reads.clone()
    }

    // Inspection must keep working after a panicking test thread poisoned the lock
    fn inspect(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn guard(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory lock store poisoned".to_string()))
    }
}

#[async_trait]
impl LockStore for MemoryLockStore {
    async fn set_state(&self, address: &Address, state: LockState) -> StoreResult<()> {
        let mut inner = self.guard()?;
        if inner.fail_writes_of == Some(state) {
            return Err(StoreError::Unavailable(format!(
                "write of {} for {} rejected",
                state, address
            )));
        }

        inner.states.insert(address.clone(), state);
        inner.writes.push((address.clone(), state));
        Ok(())
    }

    async fn get_state(&self, address: &Address) -> StoreResult<Option<LockState>> {
        let mut inner = self.guard()?;
        if inner.fail_reads {
            return Err(StoreError::Unavailable(format!(
                "read of {} rejected",
                address
            )));
        }

        inner.reads.push(address.clone());
        Ok(inner.states.get(address).copied())
    }
}
