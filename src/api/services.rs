use axum::http::StatusCode;
use tracing::{info, warn};

use super::{
    error::ApiError,
    event::{ApiEvent, ApiResponse},
    models::{HealthResponse, SearchResults},
    state::AppState,
    validation::validate_notification_body,
};
use crate::ledger::RequestStore;
use crate::notifications::{NotificationRequest, confirmation_email, confirmation_link};
use crate::search::{SearchRequest, normalize};

/// Episode search (GET /search)
///
/// ## Flow:
/// 1. Require a non-blank `query` parameter (400 with empty body otherwise)
/// 2. Normalize it into an exact-phrase query
/// 3. Ask the search client for the first page of episodes
/// 4. Return `{"results": [...]}` in upstream order
///
/// Upstream failures map to 502 instead of surfacing as a crash.
pub async fn handle_search(state: &AppState, event: ApiEvent) -> ApiResponse {
    search(state, &event)
        .await
        .unwrap_or_else(ApiError::into_api_response)
}

async fn search(state: &AppState, event: &ApiEvent) -> Result<ApiResponse, ApiError> {
    let query = event
        .query_param("query")
        .ok_or_else(|| ApiError::InvalidRequest("query parameter is required".into()))?;

    let settings = &state.config.search;
    let request = SearchRequest {
        query: normalize(query),
        entity: settings.entity.clone(),
        from: 0,
        size: settings.page_size,
        sort: settings.sort.clone(),
    };

    let results = state.search.search(&request).await.map_err(|e| {
        state.metrics.search_failed();
        warn!(error = %e, "Episode search failed");
        ApiError::Upstream(e.to_string())
    })?;

    state.metrics.search_served();
    info!(count = results.len(), "Episode search served");

    Ok(ApiResponse::json(StatusCode::OK, &SearchResults { results }))
}

/// Notification request (POST /request-notification)
///
/// ## Flow:
/// 1. Require a body with non-empty `email` and `query` strings
/// 2. Generate a URL-safe secret
/// 3. Stage the request as unconfirmed under `(email, secret)`
/// 4. Mail a confirmation link to the address
/// 5. Return 200 with an empty body
///
/// A failed send leaves the staged request behind; retention pruning removes
/// it since the link was never delivered.
pub async fn handle_notification_request(state: &AppState, event: ApiEvent) -> ApiResponse {
    request_notification(state, &event)
        .await
        .unwrap_or_else(ApiError::into_api_response)
}

async fn request_notification(state: &AppState, event: &ApiEvent) -> Result<ApiResponse, ApiError> {
    let body = event
        .non_empty_body()
        .ok_or_else(|| ApiError::InvalidRequest("request body is required".into()))?;

    let valid = validate_notification_body(body)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let secret = state.tokens.generate();
    let request = NotificationRequest::new(valid.email, valid.query, secret);

    state
        .store
        .insert_unconfirmed(&request)
        .map_err(|e| ApiError::Internal(format!("Failed to stage request: {}", e)))?;

    let link = confirmation_link(state.config.api_domain(), &request.email, &request.secret);
    let email = confirmation_email(state.config.sender_address(), &request, &link);

    state.email.send(&email).await.map_err(|e| {
        state.metrics.email_failed();
        warn!(error = %e, "Confirmation email failed");
        ApiError::Upstream(e.to_string())
    })?;

    state.metrics.notification_requested();
    info!(query = %request.query, "Notification request staged");

    Ok(ApiResponse::empty(StatusCode::OK))
}

/// Confirmation (GET /confirm-notification-request)
///
/// Moves the unconfirmed `(email, secret)` request to the confirmed set.
/// Unknown or already-confirmed pairs answer 404.
pub async fn handle_confirm_notification_request(state: &AppState, event: ApiEvent) -> ApiResponse {
    confirm_notification_request(state, &event)
        .await
        .unwrap_or_else(ApiError::into_api_response)
}

async fn confirm_notification_request(
    state: &AppState,
    event: &ApiEvent,
) -> Result<ApiResponse, ApiError> {
    let email = event
        .query_param("email")
        .ok_or_else(|| ApiError::InvalidRequest("email parameter is required".into()))?;
    let secret = event
        .query_param("secret")
        .ok_or_else(|| ApiError::InvalidRequest("secret parameter is required".into()))?;

    let confirmed = state
        .store
        .confirm(email, secret)
        .map_err(|e| ApiError::Internal(format!("Failed to confirm request: {}", e)))?
        .ok_or_else(|| ApiError::NotFound("notification request".into()))?;

    state.metrics.confirmation();
    info!(query = %confirmed.query, "Notification request confirmed");

    Ok(ApiResponse::empty(StatusCode::OK))
}

/// Health check endpoint (GET /health)
///
/// Reports the API and the notification store. Returns 503 when the store
/// cannot be read.
pub async fn health(state: &AppState) -> ApiResponse {
    use std::collections::HashMap;

    let mut components = HashMap::new();
    components.insert("api".to_string(), "healthy".to_string());

    let store_status = match state.store.stats() {
        Ok(_) => "healthy",
        Err(e) => {
            warn!(error = %e, "Notification store health check failed");
            "unhealthy"
        }
    };
    components.insert("store".to_string(), store_status.to_string());

    let all_healthy = components.values().all(|status| status == "healthy");
    let (overall_status, status_code) = if all_healthy {
        ("healthy", StatusCode::OK)
    } else {
        ("unhealthy", StatusCode::SERVICE_UNAVAILABLE)
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        components,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    ApiResponse::json(status_code, &response)
}
