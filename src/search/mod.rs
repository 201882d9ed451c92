//! Episode search against the Audiosearch API
//!
//! - [`normalize`] turns free text into an exact-phrase query
//! - [`SearchClient`] is the seam handlers call; [`AudiosearchClient`] is the
//!   production implementation

mod client;
mod normalize;

pub use client::{AudiosearchClient, AudiosearchConfig};
pub use normalize::normalize;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    RequestFailed(String),

    #[error("search request timed out")]
    Timeout,

    #[error("search API rejected credentials")]
    Unauthorized,

    #[error("search API returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("invalid search response: {0}")]
    InvalidResponse(String),
}

/// Parameters for a single search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Already-normalized query
    pub query: String,
    /// Entity type, e.g. `episodes`
    pub entity: String,
    /// Pagination offset
    pub from: u32,
    /// Page size
    pub size: u32,
    /// Upstream sort expression, e.g. `date_broadcast desc`
    pub sort: Option<String>,
}

/// Search collaborator used by the search handler.
///
/// Results are opaque episode records returned in upstream order.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Value>, SearchError>;
}

/// In-process search client returning canned results.
///
/// Records every request it receives so callers can inspect them.
#[derive(Debug, Default)]
pub struct StaticSearchClient {
    results: Vec<Value>,
    failure_status: Option<u16>,
    requests: std::sync::Mutex<Vec<SearchRequest>>,
}

impl StaticSearchClient {
    pub fn new(results: Vec<Value>) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    /// A client whose every search fails with the given upstream status
    pub fn failing(status: u16) -> Self {
        Self {
            failure_status: Some(status),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SearchClient for StaticSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Value>, SearchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(status) = self.failure_status {
            return Err(SearchError::UpstreamStatus(status));
        }

        let size = usize::try_from(request.size).unwrap_or(usize::MAX);
        Ok(self.results.iter().skip(request.from as usize).take(size).cloned().collect())
    }
}
