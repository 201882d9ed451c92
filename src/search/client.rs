//! Audiosearch API client

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{SearchClient, SearchError, SearchRequest};

/// Refresh the token this long before upstream says it expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Lifetime assumed when the token response carries no `expires_in`
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Audiosearch HTTP client configuration
#[derive(Debug, Clone)]
pub struct AudiosearchConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Value>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Client-credentials OAuth client for the Audiosearch REST API
pub struct AudiosearchClient {
    client: Client,
    config: AudiosearchConfig,
    token: Mutex<Option<CachedToken>>,
}

impl AudiosearchClient {
    pub fn new(config: AudiosearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            config,
            token: Mutex::new(None),
        })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Return a cached bearer token, fetching a new one when stale
    async fn access_token(&self) -> Result<String, SearchError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let url = format!("{}/oauth/token", self.base_url());
        debug!(%url, "Requesting Audiosearch access token");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SearchError::Unauthorized);
        }
        if !status.is_success() {
            return Err(SearchError::UpstreamStatus(status.as_u16()));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        let lifetime = token
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME)
            .saturating_sub(TOKEN_EXPIRY_MARGIN);

        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }
}

#[async_trait]
impl SearchClient for AudiosearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Value>, SearchError> {
        let token = self.access_token().await?;

        let url = format!(
            "{}/api/search/{}/{}",
            self.base_url(),
            request.entity,
            urlencoding::encode(&request.query)
        );

        let mut params = vec![
            ("from", request.from.to_string()),
            ("size", request.size.to_string()),
        ];
        if let Some(sort) = &request.sort {
            params.push(("s", sort.clone()));
        }

        debug!(
            entity = %request.entity,
            from = request.from,
            size = request.size,
            "Searching Audiosearch"
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&params)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Audiosearch returned an error status");
            if status == StatusCode::UNAUTHORIZED {
                self.token.lock().await.take();
                return Err(SearchError::Unauthorized);
            }
            return Err(SearchError::UpstreamStatus(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        debug!(count = body.results.len(), "Audiosearch results received");

        Ok(body.results)
    }
}

fn map_transport_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout
    } else {
        SearchError::RequestFailed(err.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> AudiosearchConfig {
        AudiosearchConfig {
            base_url,
            client_id: "test-id".to_string(),
            client_secret: "test-secret".to_string(),
            request_timeout: Duration::from_secs(5),
            user_agent: "podwatch-test".to_string(),
        }
    }

    fn episodes_request() -> SearchRequest {
        SearchRequest {
            query: "\"jeremy scahill\"".to_string(),
            entity: "episodes".to_string(),
            from: 0,
            size: 20,
            sort: Some("date_broadcast desc".to_string()),
        }
    }

    async fn mount_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "token-123",
                "token_type": "bearer",
                "expires_in": 7200
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_search_returns_results_in_upstream_order() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        let results: Vec<Value> = (0..20)
            .map(|i| {
                json!({
                    "show_title": "Intercepted",
                    "date_created": format!("2017-01-{:02}", 28 - i)
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/api/search/episodes/%22jeremy%20scahill%22"))
            .and(header("Authorization", "Bearer token-123"))
            .and(query_param("from", "0"))
            .and(query_param("size", "20"))
            .and(query_param("s", "date_broadcast desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": results,
                "total_results": 57
            })))
            .mount(&server)
            .await;

        let client = AudiosearchClient::new(test_config(server.uri())).unwrap();
        let found = client.search(&episodes_request()).await.unwrap();

        assert_eq!(found.len(), 20);
        assert_eq!(found, results);
    }

    #[tokio::test]
    async fn test_token_is_cached_between_searches() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "token-123",
                "expires_in": 7200
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .mount(&server)
            .await;

        let client = AudiosearchClient::new(test_config(server.uri())).unwrap();
        client.search(&episodes_request()).await.unwrap();
        client.search(&episodes_request()).await.unwrap();
    }

    #[tokio::test]
    async fn test_upstream_error_status() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = AudiosearchClient::new(test_config(server.uri())).unwrap();
        let err = client.search(&episodes_request()).await.unwrap_err();

        assert!(matches!(err, SearchError::UpstreamStatus(500)));
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = AudiosearchClient::new(test_config(server.uri())).unwrap();
        let err = client.search(&episodes_request()).await.unwrap_err();

        assert!(matches!(err, SearchError::Unauthorized));
    }

    #[tokio::test]
    async fn test_missing_results_key_yields_empty() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_results": 0 })))
            .mount(&server)
            .await;

        let client = AudiosearchClient::new(test_config(server.uri())).unwrap();
        let found = client.search(&episodes_request()).await.unwrap();

        assert!(found.is_empty());
    }
}
