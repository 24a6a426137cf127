//! Configuration module for the control worker
//!
//! This module handles assembling the configuration from defaults, an
//! optional TOML file and the environment, and validating the result.
//!
//! # Example
//!
//! ```no_run
//! use wcraas_control::config::load_config;
//!
//! let config = load_config(None).unwrap();
//! println!("Lock store: {}", config.redis.url());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AmqpConfig, Config, LogLevel, RedisConfig};

// Re-export parser functions
pub use parser::{
    apply_env, compute_config_hash, load_config, load_config_with_hash, parse_config_file,
};
pub use validation::validate;
