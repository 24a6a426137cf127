use crate::config::types::{AmqpConfig, Config, RedisConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_amqp_config(&config.amqp)?;
    validate_redis_config(&config.redis)?;
    Ok(())
}

/// Validates AMQP broker configuration
fn validate_amqp_config(config: &AmqpConfig) -> Result<(), ConfigError> {
    validate_host("amqp.host", &config.host)?;
    validate_port("amqp.port", config.port)?;

    if config.user.is_empty() {
        return Err(ConfigError::Validation(
            "amqp.user cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates Redis configuration
fn validate_redis_config(config: &RedisConfig) -> Result<(), ConfigError> {
    validate_host("redis.host", &config.host)?;
    validate_port("redis.port", config.port)?;
    Ok(())
}

fn validate_host(key: &str, host: &str) -> Result<(), ConfigError> {
    if host.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
    }

    if host.chars().any(|c| c.is_whitespace() || c == '/' || c == '@') {
        return Err(ConfigError::Validation(format!(
            "{} must be a bare host name, got '{}'",
            key, host
        )));
    }

    Ok(())
}

fn validate_port(key: &str, port: u16) -> Result<(), ConfigError> {
    if port == 0 {
        return Err(ConfigError::Validation(format!("{} must be non-zero", key)));
    }
    Ok(())
}
