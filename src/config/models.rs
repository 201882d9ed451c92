use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Fjall keyspace holding notification requests
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            store_path: default_store_path(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/notifications")
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

/// Audiosearch API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_base_url")]
    pub base_url: String,
    /// OAuth client id (usually from `AUDIOSEARCH_ID`)
    #[serde(default)]
    pub client_id: Option<String>,
    /// OAuth client secret (usually from `AUDIOSEARCH_SECRET`)
    #[serde(default, skip_serializing)]
    pub client_secret: Option<String>,
    #[serde(default = "default_entity")]
    pub entity: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Upstream sort expression; newest broadcasts first by default
    #[serde(default = "default_sort")]
    pub sort: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SearchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_base_url(),
            client_id: None,
            client_secret: None,
            entity: default_entity(),
            page_size: default_page_size(),
            sort: default_sort(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_search_base_url() -> String {
    "https://www.audiosear.ch".to_string()
}

fn default_entity() -> String {
    "episodes".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_sort() -> Option<String> {
    Some("date_broadcast desc".to_string())
}

fn default_timeout_secs() -> u64 {
    30
}

/// Outbound email configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Verified SES sender (usually from `EMAIL_SEND_ADDRESS`)
    #[serde(default)]
    pub sender_address: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            sender_address: None,
            region: default_region(),
        }
    }
}

fn default_region() -> String {
    "eu-west-1".to_string()
}

/// Notification flow configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationsConfig {
    /// Public domain of this API, used in confirmation links
    /// (usually from `API_DOMAIN_NAME`)
    #[serde(default)]
    pub api_domain: Option<String>,
    #[serde(default = "default_unconfirmed_ttl_hours")]
    pub unconfirmed_ttl_hours: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            api_domain: None,
            unconfirmed_ttl_hours: default_unconfirmed_ttl_hours(),
        }
    }
}

fn default_unconfirmed_ttl_hours() -> u64 {
    crate::ledger::RETENTION_UNCONFIRMED_HOURS
}
