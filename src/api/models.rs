//! API models for the search and notification endpoints.
//!
//! - `GET /search?query=...` answers with [`SearchResults`]
//! - `POST /request-notification` accepts a [`NotificationBody`]
//! - `GET /confirm-notification-request?email=...&secret=...` confirms a request
//!
//! Episode records are passed through exactly as Audiosearch returns them, e.g.
//!
//! ```json
//! {
//!   "results": [
//!     { "show_title": "Intercepted", "date_created": "2017-01-25", "...": "..." }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchResults {
    pub results: Vec<Value>,
}

/// Body of a notification request. Both fields are optional here so that
/// absence is reported as a validation failure rather than a parse failure.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct NotificationBody {
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub query: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, String>,
    pub version: String,
}
