//! Crawl run summary
//!
//! Counters collected while the loop runs. They are reported once the crawl
//! finishes and never influence the traversal.

use crate::address::Address;
use chrono::{DateTime, Utc};

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Address the crawl started from
    pub seed: Address,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Addresses popped from the frontier and locked
    pub processed: u64,

    /// Addresses whose discovery succeeded
    pub done: u64,

    /// Addresses whose discovery failed
    pub failed: u64,

    /// Inbound addresses pushed onto the frontier
    pub enqueued: u64,

    /// Inbound addresses skipped because the lock store already had a record
    pub skipped: u64,
}

impl CrawlReport {
    pub fn new(seed: Address) -> Self {
        Self {
            seed,
            started_at: Utc::now(),
            finished_at: None,
            processed: 0,
            done: 0,
            failed: 0,
            enqueued: 0,
            skipped: 0,
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration of the crawl, if it has finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at
            .map(|finished| finished.signed_duration_since(self.started_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_is_zeroed() {
        let report = CrawlReport::new(Address::from("https://example.com/"));

        assert_eq!(report.processed, 0);
        assert_eq!(report.done + report.failed, 0);
        assert!(report.finished_at.is_none());
        assert!(report.duration().is_none());
    }

    #[test]
    fn test_finish_sets_duration() {
        let mut report = CrawlReport::new(Address::from("https://example.com/"));
        report.finish();

        let duration = report.duration().unwrap();
        assert!(duration >= chrono::Duration::zero());
    }
}
