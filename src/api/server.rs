use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{RawQuery, State},
    http::{HeaderMap, header},
    routing::{get, post},
};
use http_body_util::BodyExt;
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tracing::{info, warn};

use super::{
    error::ApiError,
    event::{ApiEvent, ApiResponse},
    services,
    state::AppState,
    utils::{parse_content_type, parse_query_string, validate_body_size},
};
use crate::config::{Config, MAX_UNCONFIRMED_TTL_HOURS};
use crate::email::{EmailSender, RecordingEmailSender, SesEmailSender};
use crate::ledger::{NotificationStore, RequestStore};
use crate::notifications::strip_confirmation_marker;
use crate::search::{AudiosearchClient, AudiosearchConfig};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

const PRUNE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Server startup options from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides `server.bind_addr`
    pub address: Option<SocketAddr>,
    /// Log confirmation emails instead of sending them through SES
    pub dry_run_email: bool,
}

pub async fn run(options: RunOptions) -> Result<(), AnyError> {
    info!("Loading configuration");
    let config = Config::load().map_err(|e| format!("Failed to load config: {}", e))?;

    let search = AudiosearchClient::new(AudiosearchConfig {
        base_url: config.search.base_url.clone(),
        client_id: config.search.client_id.clone().unwrap_or_default(),
        client_secret: config.search.client_secret.clone().unwrap_or_default(),
        request_timeout: config.search.request_timeout(),
        user_agent: format!("podwatch/{}", env!("CARGO_PKG_VERSION")),
    })
    .map_err(|e| format!("Failed to build search client: {}", e))?;

    let email: Arc<dyn EmailSender> = if options.dry_run_email {
        warn!("Dry run: confirmation emails will be logged, not sent");
        Arc::new(RecordingEmailSender::new())
    } else {
        Arc::new(SesEmailSender::from_region(config.email.region.clone()).await)
    };

    info!(path = %config.server.store_path.display(), "Opening notification store");
    let store = NotificationStore::open(&config.server.store_path)
        .map_err(|e| format!("Failed to open notification store: {}", e))?;

    let address = options.address.unwrap_or(config.server.bind_addr);
    let state = AppState::new(config, Arc::new(search), email, store);

    tokio::spawn(prune_unconfirmed(state.clone()));

    let store = state.store.clone();
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "podwatch API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store
        .persist()
        .map_err(|e| format!("Failed to persist notification store: {}", e))?;
    info!("Notification store persisted");

    Ok(())
}

/// Build the router for all endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/search", get(search))
        .route("/request-notification", post(request_notification))
        .route("/confirm-notification-request", get(confirm_notification_request))
        .route("/health", get(health))
        .with_state(state)
        .layer(RequestDecompressionLayer::new())
}

async fn search(State(state): State<AppState>, RawQuery(raw): RawQuery) -> ApiResponse {
    let event = ApiEvent::from_query(parse_query_string(raw.as_deref()));
    services::handle_search(&state, event).await
}

async fn request_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<ApiResponse, ApiError> {
    // Clients without a Content-Type are accepted; a wrong one is not
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        let content_type = content_type
            .to_str()
            .map_err(|_| ApiError::InvalidRequest("unreadable Content-Type header".into()))?;
        parse_content_type(content_type)?;
    }

    let bytes = read_body(body, state.config.server.max_body_bytes).await?;
    let body = String::from_utf8(bytes)
        .map_err(|_| ApiError::InvalidRequest("body is not valid UTF-8".into()))?;

    let event = ApiEvent::from_body(Some(body));
    Ok(services::handle_notification_request(&state, event).await)
}

async fn confirm_notification_request(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResponse {
    let event = ApiEvent::from_query(parse_query_string(raw.as_deref()));
    services::handle_confirm_notification_request(&state, event).await
}

/// Root route. Confirmation links point here with the shape
/// `/?confirm-notification-request?email=..&secret=..`.
async fn root(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse, ApiError> {
    let params = raw
        .as_deref()
        .and_then(strip_confirmation_marker)
        .ok_or_else(|| ApiError::NotFound("route".into()))?;

    let event = ApiEvent::from_query(parse_query_string(Some(params)));
    Ok(services::handle_confirm_notification_request(&state, event).await)
}

async fn health(State(state): State<AppState>) -> ApiResponse {
    services::health(&state).await
}

/// Reads the request body and enforces the size limit
///
/// Decompression is handled by RequestDecompressionLayer, so the limit
/// applies to decompressed bytes.
async fn read_body(body: axum::body::Body, max_size: usize) -> Result<Vec<u8>, ApiError> {
    let data = body
        .collect()
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
        .to_bytes()
        .to_vec();

    validate_body_size(&data, max_size)?;

    Ok(data)
}

/// Periodically drop unconfirmed requests past their retention
async fn prune_unconfirmed(state: AppState) {
    let hours = state
        .config
        .notifications
        .unconfirmed_ttl_hours
        .min(MAX_UNCONFIRMED_TTL_HOURS);
    let ttl = chrono::Duration::hours(hours as i64);
    let mut interval = tokio::time::interval(PRUNE_INTERVAL);

    loop {
        interval.tick().await;

        let cutoff = chrono::Utc::now() - ttl;
        let store = state.store.clone();
        match tokio::task::spawn_blocking(move || store.prune_unconfirmed_before(cutoff)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(error = %e, "Pruning unconfirmed requests failed"),
            Err(e) => warn!(error = %e, "Pruning task panicked"),
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
