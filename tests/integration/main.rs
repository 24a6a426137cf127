//! Integration tests for the crawl orchestrator
//!
//! These drive the full crawl loop against the in-memory lock store and a
//! scripted discovery backend standing in for the remote workers.

mod crawl_tests;
mod support;
