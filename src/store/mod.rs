//! Lock store module for distributed deduplication
//!
//! This module handles the shared marker board, including:
//! - The `LockStore` trait consumed by the crawl loop
//! - A Redis-backed store shared by all orchestrators and workers
//! - An in-process store for tests and local runs

mod memory;
mod redis_store;
mod traits;

pub use memory::MemoryLockStore;
pub use redis_store::RedisLockStore;
pub use traits::{LockStore, StoreError, StoreResult};

use crate::config::RedisConfig;

/// Connects to the Redis lock store described by the configuration
///
/// # Arguments
///
/// * `config` - The Redis endpoint configuration
///
/// # Returns
///
/// * `Ok(RedisLockStore)` - Connected store
/// * `Err(StoreError)` - Failed to open the connection
pub async fn open_lock_store(config: &RedisConfig) -> StoreResult<RedisLockStore> {
    RedisLockStore::connect(&config.url()).await
}
