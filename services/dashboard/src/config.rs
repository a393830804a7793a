//! services/dashboard/src/config.rs
//!
//! Defines the dashboard's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub log_level: Level,
    /// How long a notification stays visible unless dismissed.
    pub notification_ttl: Duration,
    /// Simulated latency before the assistant answers a message.
    pub reply_delay: Duration,
    /// Delay before the greeting once step 1 is accepted.
    pub greeting_delay: Duration,
    pub seed_mock_data: bool,
    pub instructor_name: String,
    pub instructor_email: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            notification_ttl: Duration::from_millis(5000),
            reply_delay: Duration::from_millis(1500),
            greeting_delay: Duration::from_millis(500),
            seed_mock_data: true,
            instructor_name: "John Doe".to_string(),
            instructor_email: "john.doe@example.com".to_string(),
        }
    }
}

fn millis_var(name: &str, default: Duration) -> Result<Duration, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

fn bool_var(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidValue(
                name.to_string(),
                format!("'{}' is not a boolean", other),
            )),
        },
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        let defaults = Self::default();

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Timers ---
        let notification_ttl = millis_var("NOTIFICATION_TTL_MS", defaults.notification_ttl)?;
        let reply_delay = millis_var("REPLY_DELAY_MS", defaults.reply_delay)?;
        let greeting_delay = millis_var("GREETING_DELAY_MS", defaults.greeting_delay)?;
        if notification_ttl.is_zero() {
            return Err(ConfigError::InvalidValue(
                "NOTIFICATION_TTL_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        // --- Session and data ---
        let seed_mock_data = bool_var("SEED_MOCK_DATA", defaults.seed_mock_data)?;
        let instructor_name =
            std::env::var("INSTRUCTOR_NAME").unwrap_or(defaults.instructor_name);
        let instructor_email =
            std::env::var("INSTRUCTOR_EMAIL").unwrap_or(defaults.instructor_email);
        if instructor_name.trim().is_empty() {
            return Err(ConfigError::MissingVar("INSTRUCTOR_NAME".to_string()));
        }

        Ok(Self {
            log_level,
            notification_ttl,
            reply_delay,
            greeting_delay,
            seed_mock_data,
            instructor_name,
            instructor_email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dashboard_timings() {
        let config = Config::default();
        assert_eq!(config.notification_ttl, Duration::from_secs(5));
        assert_eq!(config.reply_delay, Duration::from_millis(1500));
        assert_eq!(config.greeting_delay, Duration::from_millis(500));
        assert!(config.seed_mock_data);
    }

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        assert_eq!(
            millis_var("DASHBOARD_TEST_UNSET_MS", Duration::from_millis(42)).unwrap(),
            Duration::from_millis(42)
        );
        assert!(bool_var("DASHBOARD_TEST_UNSET_BOOL", true).unwrap());
    }
}
