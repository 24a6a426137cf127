use crate::config::types::{Config, LogLevel};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::str::FromStr;

pub const ENV_AMQP_HOST: &str = "AMQP_HOST";
pub const ENV_AMQP_PORT: &str = "AMQP_PORT";
pub const ENV_AMQP_USER: &str = "AMQP_USER";
pub const ENV_AMQP_PASSWORD: &str = "AMQP_PASSWORD";
pub const ENV_REDIS_HOST: &str = "REDIS_HOST";
pub const ENV_REDIS_PORT: &str = "REDIS_PORT";
pub const ENV_POLLING_INTERVAL: &str = "POLLING_INTERVAL";
pub const ENV_LOGLEVEL: &str = "LOGLEVEL";

/// Loads the effective configuration
///
/// Sources, lowest to highest precedence: built-in defaults, the optional
/// TOML file at `path`, a `.env` file in the working directory, and the
/// process environment. Variables already present in the environment are
/// never overridden by `.env`.
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use wcraas_control::config::load_config;
///
/// let config = load_config(None).unwrap();
/// println!("Polling every {}s", config.polling_interval);
/// ```
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config_file(path)?,
        None => Config::default(),
    };

    load_dotenv()?;
    apply_env(&mut config, |key| std::env::var(key).ok())?;

    validate(&config)?;

    Ok(config)
}

/// Parses a TOML configuration file without applying the environment
///
/// Missing keys fall back to their defaults.
pub fn parse_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Overlays environment variables onto `config`
///
/// `lookup` resolves a variable name to its value, if set.
pub fn apply_env<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup(ENV_AMQP_HOST) {
        config.amqp.host = host;
    }
    if let Some(port) = parse_var(&lookup, ENV_AMQP_PORT)? {
        config.amqp.port = port;
    }
    if let Some(user) = lookup(ENV_AMQP_USER) {
        config.amqp.user = user;
    }
    if let Some(password) = lookup(ENV_AMQP_PASSWORD) {
        config.amqp.password = password;
    }

    if let Some(host) = lookup(ENV_REDIS_HOST) {
        config.redis.host = host;
    }
    if let Some(port) = parse_var(&lookup, ENV_REDIS_PORT)? {
        config.redis.port = port;
    }

    if let Some(interval) = parse_var(&lookup, ENV_POLLING_INTERVAL)? {
        config.polling_interval = interval;
    }
    if let Some(level) = parse_var::<LogLevel, _>(&lookup, ENV_LOGLEVEL)? {
        config.loglevel = level;
    }

    Ok(())
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        None => Ok(None),
    }
}

fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Computes a SHA-256 fingerprint of the effective configuration
///
/// The AMQP password is left out so the fingerprint can be logged.
///
/// # Returns
///
/// Hex-encoded SHA-256 hash
pub fn compute_config_hash(config: &Config) -> String {
    let canonical = format!(
        "amqp={}@{}:{};redis={}:{};polling-interval={};loglevel={}",
        config.amqp.user,
        config.amqp.host,
        config.amqp.port,
        config.redis.host,
        config.redis.port,
        config.polling_interval,
        config.loglevel,
    );

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Loads a configuration and returns both the config and its fingerprint
pub fn load_config_with_hash(path: Option<&Path>) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(&config);
    Ok((config, hash))
}
