use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;
use tracing::debug;

use super::event::ApiResponse;
use super::models::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("payload too large: {0} bytes")]
    PayloadTooLarge(usize),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("upstream service failed: {0}")]
    Upstream(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "INVALID_REQUEST",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Render as an invocation response.
    ///
    /// Client errors carry an empty body so nothing about validation leaks;
    /// server-side failures carry an [`ErrorResponse`].
    pub fn into_api_response(self) -> ApiResponse {
        let status = self.status_code();

        if status.is_client_error() {
            debug!(code = self.code(), reason = %self, "Rejecting request");
            return ApiResponse::empty(status);
        }

        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        };
        ApiResponse::json(status, &body)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        self.into_api_response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_have_empty_body() {
        for err in [
            ApiError::InvalidRequest("missing email".into()),
            ApiError::PayloadTooLarge(10),
            ApiError::NotFound("request".into()),
        ] {
            let status = err.status_code().as_u16();
            let response = err.into_api_response();
            assert_eq!(response.status_code, status);
            assert!(response.body.is_empty());
        }
    }

    #[test]
    fn test_upstream_error_body() {
        let response =
            ApiError::Upstream("search API returned HTTP 500".into()).into_api_response();
        assert_eq!(response.status_code, 502);

        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["code"], "UPSTREAM_ERROR");
        assert_eq!(
            body["message"],
            "upstream service failed: search API returned HTTP 500"
        );
    }

    #[test]
    fn test_internal_error_status() {
        let response = ApiError::Internal("store".into()).into_api_response();
        assert_eq!(response.status_code, 500);
        assert!(response.body.contains("INTERNAL_ERROR"));
    }
}
