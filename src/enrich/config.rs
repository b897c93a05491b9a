//! enrich::config
//!
//! Enrichment client configuration.
//!
//! # Format
//!
//! TOML, all fields optional with defaults:
//!
//! ```toml
//! modrinth_delay_ms = 500
//! curseforge_delay_ms = 1000
//! github_delay_ms = 500
//! request_timeout_secs = 10
//! curseforge_scrape = true
//!
//! [retry]
//! max_attempts = 3
//! base_delay_ms = 1000
//! multiplier = 2.0
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing; a zero retry budget or a
//! sub-unity multiplier is rejected rather than silently clamped.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::backoff::RetryPolicy;
use crate::core::types::Platform;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Retry section of the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts including the first.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Delay multiplier per subsequent retry.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            multiplier: self.multiplier,
        }
    }
}

/// Enrichment client configuration.
///
/// Per-platform cooldowns default to the upstream-friendly values the
/// platforms tolerate: 1 req/s for scraped CurseForge pages, 2 req/s for
/// the Modrinth and GitHub APIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnrichConfig {
    /// Minimum delay after each Modrinth request, in milliseconds.
    pub modrinth_delay_ms: u64,

    /// Minimum delay after each CurseForge relay request, in milliseconds.
    pub curseforge_delay_ms: u64,

    /// Minimum delay after each GitHub request, in milliseconds.
    pub github_delay_ms: u64,

    /// Per-request timeout, in seconds.
    pub request_timeout_secs: u64,

    /// Whether to scrape CurseForge pages at all. When false the
    /// CurseForge adapter returns fallback records without any network
    /// call (the cheap mode for deployments that cannot afford relays).
    pub curseforge_scrape: bool,

    /// Retry/backoff policy shared by all adapters.
    pub retry: RetryConfig,

    /// Modrinth API base URL (overridable for tests).
    pub modrinth_api_base: String,

    /// GitHub API base URL (overridable for tests).
    pub github_api_base: String,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            modrinth_delay_ms: 500,
            curseforge_delay_ms: 1000,
            github_delay_ms: 500,
            request_timeout_secs: 10,
            curseforge_scrape: true,
            retry: RetryConfig::default(),
            modrinth_api_base: "https://api.modrinth.com/v2".to_string(),
            github_api_base: "https://api.github.com".to_string(),
        }
    }
}

impl EnrichConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.retry.multiplier < 1.0 {
            return Err(ConfigError::InvalidValue(format!(
                "retry.multiplier must be >= 1.0, got {}",
                self.retry.multiplier
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.modrinth_api_base.is_empty() || self.github_api_base.is_empty() {
            return Err(ConfigError::InvalidValue(
                "API base URLs cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Cooldown after a request to the given platform.
    pub fn cooldown_for(&self, platform: Platform) -> Duration {
        let ms = match platform {
            Platform::Modrinth => self.modrinth_delay_ms,
            Platform::CurseForge => self.curseforge_delay_ms,
            Platform::GitHub => self.github_delay_ms,
            Platform::Other => 0,
        };
        Duration::from_millis(ms)
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EnrichConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cooldown_for(Platform::CurseForge), Duration::from_millis(1000));
        assert_eq!(config.cooldown_for(Platform::Modrinth), Duration::from_millis(500));
        assert_eq!(config.cooldown_for(Platform::Other), Duration::ZERO);
    }

    #[test]
    fn parses_partial_toml() {
        let config = EnrichConfig::from_toml_str(
            r#"
            curseforge_scrape = false

            [retry]
            max_attempts = 5
            "#,
        )
        .unwrap();
        assert!(!config.curseforge_scrape);
        assert_eq!(config.retry.max_attempts, 5);
        // Untouched fields keep defaults.
        assert_eq!(config.modrinth_delay_ms, 500);
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(EnrichConfig::from_toml_str("not_a_field = 1").is_err());
    }

    #[test]
    fn rejects_zero_retry_budget() {
        let err = EnrichConfig::from_toml_str("[retry]\nmax_attempts = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn rejects_shrinking_multiplier() {
        let err = EnrichConfig::from_toml_str("[retry]\nmultiplier = 0.5").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn retry_config_maps_to_policy() {
        let policy = RetryConfig {
            max_attempts: 4,
            base_delay_ms: 250,
            multiplier: 3.0,
        }
        .policy();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
        assert_eq!(policy.delay_for(1), Duration::from_millis(750));
    }
}
