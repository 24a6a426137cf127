//! Crawler module for orchestrating a crawl
//!
//! This module contains the core crawling logic, including:
//! - The LIFO frontier of pending addresses
//! - The crawl loop with distributed locking
//! - Run reporting

mod coordinator;
mod frontier;
mod report;

pub use coordinator::{Coordinator, CrawlContext};
pub use frontier::Frontier;
pub use report::CrawlReport;

use crate::address::Address;
use crate::config::Config;
use crate::rpc::{AmqpRpcClient, DiscoveryClient};
use crate::store::open_lock_store;
use crate::ControlError;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Checks that a crawl target is an absolute URL
///
/// The target is returned verbatim as an [`Address`]; parsing is only used
/// for validation so the lock store key matches what the workers report.
pub fn parse_target(target: &str) -> Result<Address, ControlError> {
    Url::parse(target).map_err(|source| ControlError::InvalidTarget {
        target: target.to_string(),
        source,
    })?;
    Ok(Address::from(target))
}

/// Connects to the lock store and the broker
pub async fn connect(config: &Config) -> Result<CrawlContext, ControlError> {
    let store = open_lock_store(&config.redis).await?;
    let client = AmqpRpcClient::connect(&config.amqp).await?;
    Ok(CrawlContext::new(Arc::new(store), Arc::new(client)))
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Connect to the Redis lock store
/// 2. Connect to the AMQP broker
/// 3. Drive the frontier from `seed` until it is exhausted
///
/// # Arguments
///
/// * `config` - The control worker configuration
/// * `seed` - Entry point of the crawl
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed successfully
/// * `Err(ControlError)` - Connecting failed or the lock store failed mid-crawl
///
/// # Example
///
/// ```no_run
/// use wcraas_control::config::load_config;
/// use wcraas_control::crawler::{parse_target, run_crawl};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(None)?;
/// let report = run_crawl(&config, parse_target("https://example.com/")?).await?;
/// println!("{} pages done", report.done);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, seed: Address) -> Result<CrawlReport, ControlError> {
    let context = connect(config).await?;
    let coordinator = Coordinator::from_config(config);
    Ok(coordinator.crawl(&context, seed).await?)
}

/// Lists the collections available at the storage service
pub async fn run_list_collections(config: &Config) -> Result<Value, ControlError> {
    let client = AmqpRpcClient::connect(&config.amqp).await?;
    Ok(client.list_collections().await?)
}
