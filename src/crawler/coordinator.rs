//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop, which:
//! - Owns the frontier for the duration of one crawl
//! - Claims each address in the shared lock store before working on it
//! - Delegates discovery to a remote worker
//! - Records the outcome and expands the frontier with unclaimed addresses
//! - Paces iterations with a fixed delay

use crate::address::Address;
use crate::config::Config;
use crate::crawler::frontier::Frontier;
use crate::crawler::report::CrawlReport;
use crate::rpc::{DiscoveryClient, DiscoveryError};
use crate::state::LockState;
use crate::store::{LockStore, StoreResult};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Handles a crawl works through
///
/// Bundles the shared lock store and the discovery backend so the loop has
/// no hidden global state. Cloning is cheap.
#[derive(Clone)]
pub struct CrawlContext {
    store: Arc<dyn LockStore>,
    discovery: Arc<dyn DiscoveryClient>,
}

impl CrawlContext {
    pub fn new(store: Arc<dyn LockStore>, discovery: Arc<dyn DiscoveryClient>) -> Self {
        Self { store, discovery }
    }

    pub fn store(&self) -> &dyn LockStore {
        self.store.as_ref()
    }

    pub fn discovery(&self) -> &dyn DiscoveryClient {
        self.discovery.as_ref()
    }
}

impl fmt::Debug for CrawlContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrawlContext").finish_non_exhaustive()
    }
}

/// Main crawler coordinator structure
#[derive(Debug, Clone)]
pub struct Coordinator {
    poll_interval: Duration,
}

impl Coordinator {
    /// Creates a coordinator pausing `poll_interval` between iterations
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.poll_interval())
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Crawls everything reachable from `seed`
    ///
    /// Each iteration pops the most recently discovered address, marks it
    /// `LOCKED`, asks a worker to discover it and records `DONE` or `FAILED`.
    /// Inbound addresses without a lock record are pushed onto the frontier in
    /// the order the worker returned them. The crawl ends as soon as the
    /// frontier is empty; no delay follows the last iteration.
    ///
    /// A failed discovery only fails its own address. Any lock store error
    /// aborts the crawl, leaving the store as the last successful write left
    /// it.
    ///
    /// # Arguments
    ///
    /// * `context` - Lock store and discovery handles
    /// * `seed` - Address the crawl starts from
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The frontier was exhausted
    /// * `Err(StoreError)` - The lock store failed
    pub async fn crawl(&self, context: &CrawlContext, seed: Address) -> StoreResult<CrawlReport> {
        tracing::info!("Starting crawl from {}", seed);

        let mut report = CrawlReport::new(seed.clone());
        let mut frontier = Frontier::seeded(seed);

        while !frontier.is_empty() {
            let Some(address) = frontier.pop_next() else {
                break;
            };

            tracing::info!("Processing {} ...", address);
            report.processed += 1;

            context.store().set_state(&address, LockState::Locked).await?;

            let inbound = match self.discover(context, &address).await {
                Ok(inbound) => inbound,
                Err(e) => {
                    tracing::error!("Discovery for {} failed: {}", address, e);
                    context.store().set_state(&address, LockState::Failed).await?;
                    report.failed += 1;
                    continue;
                }
            };

            context.store().set_state(&address, LockState::Done).await?;
            report.done += 1;

            self.expand(context, &mut frontier, inbound, &mut report).await?;

            if frontier.is_empty() {
                break;
            }

            tracing::debug!(
                "{} addresses pending, next iteration in {:?}",
                frontier.len(),
                self.poll_interval
            );
            if !self.poll_interval.is_zero() {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        report.finish();
        tracing::info!(
            "Frontier is empty, crawl from {} complete: {} processed ({} done, {} failed)",
            report.seed,
            report.processed,
            report.done,
            report.failed
        );

        Ok(report)
    }

    /// Lists the collections of the storage service
    pub async fn list_collections(&self, context: &CrawlContext) -> Result<Value, DiscoveryError> {
        tracing::debug!("Requesting collection list");
        context.discovery().list_collections().await
    }

    async fn discover(
        &self,
        context: &CrawlContext,
        address: &Address,
    ) -> Result<Vec<Address>, DiscoveryError> {
        let result = context.discovery().discover(address).await?;

        tracing::info!("RPC for {} completed successfully!", address);
        tracing::debug!("RPC response for {}: {:?}", address, result);

        Ok(result.inbound)
    }

    /// Pushes every inbound address that has no lock record yet
    async fn expand(
        &self,
        context: &CrawlContext,
        frontier: &mut Frontier,
        inbound: Vec<Address>,
        report: &mut CrawlReport,
    ) -> StoreResult<()> {
        for address in inbound {
            tracing::info!("Checking {} against lock store ...", address);

            match context.store().get_state(&address).await? {
                Some(state) if state.is_claimed() => {
                    tracing::info!("Skipping {} due to lock hit ({})", address, state);
                    report.skipped += 1;
                }
                _ => {
                    tracing::info!("Adding {} due to lock miss!", address);
                    frontier.push(address);
                    report.enqueued += 1;
                }
            }
        }

        Ok(())
    }
}
