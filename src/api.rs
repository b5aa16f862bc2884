use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::models::{ChannelInfo, EventCard};
use crate::storage::TokenStore;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(String),
    #[error("request failed: {status}: {message}")]
    Status { status: u16, message: String },
    #[error("parse error: {0}")]
    Parse(String),
}

/// Where event lists come from. `ApiClient` is the real source; tests hand the
/// presentation layer doubles instead.
pub trait EventsSource {
    fn fetch_events(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<EventCard>, ApiError>> + Send;
}

pub struct ApiClient {
    config: ApiConfig,
    tokens: Option<Arc<TokenStore>>,
    client: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            tokens: None,
            client: build_client(),
        }
    }

    /// A client that can attach `Authorization: Bearer` headers on requests
    /// marked as authenticated.
    pub fn with_tokens(config: ApiConfig, tokens: Arc<TokenStore>) -> Self {
        Self {
            config,
            tokens: Some(tokens),
            client: build_client(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// GET `{base}/events?limit={limit}`, bypassing caches so every call sees
    /// current server state. Transport failures, non-2xx statuses, and
    /// unparseable bodies all surface as errors; "zero events" and "fetch
    /// failed" must stay distinguishable for the layer above.
    pub async fn fetch_events(&self, limit: u32) -> Result<Vec<EventCard>, ApiError> {
        self.get_json(&format!("events?limit={limit}")).await
    }

    pub async fn fetch_eco_channels(&self) -> Result<Vec<ChannelInfo>, ApiError> {
        self.get_json("debug/eco-channels").await
    }

    /// Kicks off server-side ingestion of recent posts. The response body is
    /// not inspected; callers only wait for completion before re-querying the
    /// events list.
    pub async fn trigger_event_ingest(
        &self,
        per_channel_limit: u32,
        event_only: bool,
    ) -> Result<(), ApiError> {
        let path = format!(
            "debug/telegram-fetch-event-posts?per_channel_limit={per_channel_limit}&event_only={event_only}"
        );
        let response = self
            .client
            .post(self.build_url(&path))
            .send()
            .await
            .map_err(|err| ApiError::Http(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }
        Ok(())
    }

    /// Generic JSON request: resolves relative paths against the configured
    /// base, attaches the bearer token when `auth` is set and one is stored,
    /// and serializes `body` as JSON when supplied. A 204 resolves to
    /// `Ok(None)` rather than an attempt to parse an empty body.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        auth: bool,
    ) -> Result<Option<T>, ApiError> {
        let mut request = self.client.request(method, self.build_url(path));
        if auth {
            if let Some(token) = self.tokens.as_ref().and_then(|store| store.access_token()) {
                request = request.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Http(err.to_string()))?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let text = response
            .text()
            .await
            .map_err(|err| ApiError::Http(err.to_string()))?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &text),
            });
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|err| ApiError::Parse(err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.build_url(path))
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|err| ApiError::Http(err.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ApiError::Http(err.to_string()))?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &text),
            });
        }
        serde_json::from_str(&text).map_err(|err| ApiError::Parse(err.to_string()))
    }

    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl EventsSource for ApiClient {
    async fn fetch_events(&self, limit: u32) -> Result<Vec<EventCard>, ApiError> {
        ApiClient::fetch_events(self, limit).await
    }
}

fn build_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(20))
        .user_agent(concat!("event-feed/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("http client")
}

/// Best-effort human-readable message for a failed request: the `detail`
/// field of a JSON error body when present, a generic status line otherwise.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|payload| {
            payload.get("detail").and_then(|detail| {
                if detail.is_null() {
                    None
                } else {
                    Some(match detail.as_str() {
                        Some(text) => text.to_string(),
                        None => detail.to_string(),
                    })
                }
            })
        })
        .unwrap_or_else(|| format!("Request failed: {status}"))
}
