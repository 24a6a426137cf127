//! Lock store trait and error types
//!
//! This module defines the trait interface for lock store backends and
//! associated error types.

use crate::address::Address;
use crate::state::LockState;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during lock store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Invalid lock state {value} stored for {address}")]
    InvalidState { address: Address, value: i64 },

    #[error("Lock store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for lock store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for lock store implementations
///
/// The store is a plain marker board: no transactions, no expiry and no
/// compare-and-swap. Every call is a round trip to the backend and failures
/// are returned as-is, never retried.
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Records `state` for `address`, overwriting any previous value
    async fn set_state(&self, address: &Address, state: LockState) -> StoreResult<()>;

    /// Reads the state recorded for `address`
    ///
    /// `None` means no record exists, which is equivalent to `LockState::Free`.
    async fn get_state(&self, address: &Address) -> StoreResult<Option<LockState>>;
}
