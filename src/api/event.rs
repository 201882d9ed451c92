//! HTTP-style invocation contract shared by every handler.
//!
//! An [`ApiEvent`] mirrors a proxy-integration request (optional query-string
//! parameters, optional raw body) and an [`ApiResponse`] is a status code with
//! a string body. Handlers only ever see these two types, which keeps them
//! independent of the HTTP server hosting them.

use std::collections::HashMap;

use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiEvent {
    pub fn from_query(params: Option<HashMap<String, String>>) -> Self {
        Self {
            query_string_parameters: params,
            body: None,
        }
    }

    pub fn from_body(body: Option<String>) -> Self {
        Self {
            query_string_parameters: None,
            body,
        }
    }

    /// Query parameter `name`, treating blank values as absent
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()?
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Request body, treating an empty string as absent
    pub fn non_empty_body(&self) -> Option<&str> {
        self.body.as_deref().filter(|body| !body.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status_code: status.as_u16(),
            body: String::new(),
        }
    }

    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_string(body) {
            Ok(body) => Self {
                status_code: status.as_u16(),
                body,
            },
            Err(err) => {
                error!(error = %err, "Failed to serialize response body");
                Self::empty(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if self.body.is_empty() {
            return status.into_response();
        }

        (
            status,
            [(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())],
            self.body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_deserializes_proxy_shape() {
        let event: ApiEvent = serde_json::from_value(json!({
            "queryStringParameters": { "query": "jeremy scahill" },
            "body": null
        }))
        .unwrap();

        assert_eq!(event.query_param("query"), Some("jeremy scahill"));
        assert_eq!(event.non_empty_body(), None);
    }

    #[test]
    fn test_event_tolerates_missing_fields() {
        let event: ApiEvent = serde_json::from_value(json!({})).unwrap();
        assert_eq!(event, ApiEvent::default());
    }

    #[test]
    fn test_blank_query_param_is_absent() {
        let params = HashMap::from([
            ("query".to_string(), "   ".to_string()),
            ("foo".to_string(), "bar".to_string()),
        ]);
        let event = ApiEvent::from_query(Some(params));

        assert_eq!(event.query_param("query"), None);
        assert_eq!(event.query_param("missing"), None);
        assert_eq!(event.query_param("foo"), Some("bar"));
    }

    #[test]
    fn test_response_serializes_status_code() {
        let response = ApiResponse::empty(StatusCode::BAD_REQUEST);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({ "statusCode": 400, "body": "" }));
    }
}
