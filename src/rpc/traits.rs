//! Discovery client trait and error types

use crate::address::Address;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during a remote call
///
/// The crawl loop treats every variant the same way; the split only exists
/// to make logs readable.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote worker raised: {0}")]
    Remote(String),

    #[error("Malformed reply: {0}")]
    Malformed(String),
}

impl From<lapin::Error> for DiscoveryError {
    fn from(err: lapin::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Successful outcome of a discovery call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryResult {
    /// Same-origin addresses reachable from the processed address, in the
    /// order the worker reported them
    pub inbound: Vec<Address>,
}

impl DiscoveryResult {
    pub fn new(inbound: Vec<Address>) -> Self {
        Self { inbound }
    }
}

/// Trait for remote discovery backends
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Asks a worker to discover the pages related to `address`
    async fn discover(&self, address: &Address) -> Result<DiscoveryResult, DiscoveryError>;

    /// Lists the collections known to the storage service
    ///
    /// The reply is returned verbatim.
    async fn list_collections(&self) -> Result<Value, DiscoveryError>;
}
