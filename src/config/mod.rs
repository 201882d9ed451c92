//! Configuration management for podwatch
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use podwatch::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `PODWATCH__<section>__<key>`
//!
//! Examples:
//! - `PODWATCH__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `PODWATCH__SEARCH__PAGE_SIZE=50`
//!
//! Credentials and deployment values are also read from `AUDIOSEARCH_ID`,
//! `AUDIOSEARCH_SECRET`, `EMAIL_SEND_ADDRESS`, `API_DOMAIN_NAME` and
//! `EMAIL_REGION` (falling back to `AWS_REGION`).
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/podwatch.toml`.
//! This can be overridden using the `PODWATCH_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{Config, EmailConfig, NotificationsConfig, SearchConfig, ServerConfig};
pub use validation::{MAX_UNCONFIRMED_TTL_HOURS, ValidationError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Conventional variables (`AUDIOSEARCH_ID`, `API_DOMAIN_NAME`, ...)
    /// 2. Environment variables (`PODWATCH__*`)
    /// 3. TOML file (default: `config/podwatch.toml`)
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - A required option (search credentials, sender, domain, region) is absent
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Public domain used in confirmation links. Empty until validated.
    pub fn api_domain(&self) -> &str {
        self.notifications.api_domain.as_deref().unwrap_or_default()
    }

    /// Verified sender address. Empty until validated.
    pub fn sender_address(&self) -> &str {
        self.email.sender_address.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[search]
client_id = "id"
client_secret = "secret"

[email]
sender_address = "alerts@example.com"

[notifications]
api_domain = "api.example.com"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.api_domain(), "api.example.com");
        assert_eq!(config.sender_address(), "alerts@example.com");
        assert_eq!(config.email.region, "eu-west-1");
    }

    #[test]
    fn test_missing_credentials_fail_fast() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[email]
sender_address = "alerts@example.com"

[notifications]
api_domain = "api.example.com"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::MissingOption {
                option: "search.client_id"
            })
        ));
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[search\nclient_id = ").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(result.unwrap_err(), ConfigError::LoadError(_)));
    }
}
