//! WCraaS Control: crawl orchestration for the WCraaS platform
//!
//! This crate drives the crawl frontier for a single target. Per-page
//! discovery is delegated to remote workers over AMQP RPC, and a shared Redis
//! instance acts as the lock board that keeps orchestrators and workers from
//! crawling the same address twice.

pub mod address;
pub mod config;
pub mod crawler;
pub mod rpc;
pub mod state;
pub mod store;

use thiserror::Error;

/// Main error type for control operations
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lock store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] rpc::DiscoveryError),

    #[error("RPC connection error: {0}")]
    Rpc(#[from] lapin::Error),

    #[error("Invalid crawl target '{target}': {source}")]
    InvalidTarget {
        target: String,
        source: ::url::ParseError,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to load .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for control operations
pub type Result<T> = std::result::Result<T, ControlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use address::Address;
pub use config::Config;
pub use crawler::{CrawlContext, CrawlReport, Coordinator};
pub use state::LockState;
