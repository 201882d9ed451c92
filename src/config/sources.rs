use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "PODWATCH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/podwatch.toml";
const ENV_PREFIX: &str = "PODWATCH";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_from_sources(config_path)?;
    load_secrets(&mut config, |name| env::var(name).ok());

    Ok(config)
}

/// Fill credentials and deployment values from their conventional variables.
///
/// These names predate the `PODWATCH__*` scheme and win over file values.
pub(crate) fn load_secrets<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(id) = lookup("AUDIOSEARCH_ID") {
        config.search.client_id = Some(id);
    }
    if let Some(secret) = lookup("AUDIOSEARCH_SECRET") {
        config.search.client_secret = Some(secret);
    }
    if let Some(sender) = lookup("EMAIL_SEND_ADDRESS") {
        config.email.sender_address = Some(sender);
    }
    if let Some(domain) = lookup("API_DOMAIN_NAME") {
        config.notifications.api_domain = Some(domain);
    }

    if let Some(region) = lookup("EMAIL_REGION").or_else(|| lookup("AWS_REGION")) {
        config.email.region = region;
    }
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // PODWATCH__SEARCH__PAGE_SIZE -> search.page_size
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
