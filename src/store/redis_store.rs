//! Redis lock store implementation
//!
//! Keys are the raw address strings and values the integer lock state.
//! Records never expire.

use crate::address::Address;
use crate::state::LockState;
use crate::store::traits::{LockStore, StoreError, StoreResult};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use std::fmt;
use tracing::{debug, info};

/// Lock store backed by a shared Redis instance
#[derive(Clone)]
pub struct RedisLockStore {
    conn: ConnectionManager,
}

impl fmt::Debug for RedisLockStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisLockStore")
            .field("connection", &"ConnectionManager")
            .finish()
    }
}

impl RedisLockStore {
    /// Opens a managed connection to the Redis instance at `redis_url`
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        info!("Connecting to Redis lock store at {}", redis_url);

        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        info!("Successfully connected to Redis lock store");

        Ok(Self { conn })
    }
}

#[async_trait]
impl LockStore for RedisLockStore {
    async fn set_state(&self, address: &Address, state: LockState) -> StoreResult<()> {
        debug!("Lock SET: {} = {}", address, state);

        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(address.as_str(), state.as_i64()).await?;

        Ok(())
    }

    async fn get_state(&self, address: &Address) -> StoreResult<Option<LockState>> {
        let mut conn = self.conn.clone();
        let raw: Option<i64> = conn.get(address.as_str()).await?;

        let state = decode_state(address, raw)?;
        match state {
            Some(state) => debug!("Lock GET: {} = {}", address, state),
            None => debug!("Lock GET: {} has no record", address),
        }
        Ok(state)
    }
}

/// Maps a raw Redis value onto a lock state
///
/// A missing key means no orchestrator ever touched the address. Integers
/// outside the known states are reported rather than treated as free.
fn decode_state(address: &Address, raw: Option<i64>) -> StoreResult<Option<LockState>> {
    raw.map(|value| {
        LockState::from_i64(value).ok_or_else(|| StoreError::InvalidState {
            address: address.clone(),
            value,
        })
    })
    .transpose()
}
