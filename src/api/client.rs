//! HTTP client for the collection list endpoints.

use crate::api::ApiError;
use crate::config::ApiConfig;
use crate::data::CollectionSource;
use crate::models::CollectionKind;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Client for the record-keeping API.
pub struct ApiClient {
    config: ApiConfig,
    http_client: reqwest::Client,
}

impl ApiClient {
    /// Create a client using the configured base URL, endpoints and timeout.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        info!("Initializing API client for {}", config.base_url);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config: config.clone(),
            http_client,
        })
    }

    /// Base URL the client talks to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Full URL of a collection's list endpoint.
    pub fn endpoint_url(&self, kind: CollectionKind) -> String {
        join_url(&self.config.base_url, self.config.endpoints.path(kind))
    }

    /// GET a URL and parse the body as JSON.
    async fn get_json(&self, kind: CollectionKind, url: &str) -> Result<Value, ApiError> {
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, url, self.config.timeout_seconds))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                ApiError::Decode {
                    collection: kind,
                    message: e.to_string(),
                }
            } else {
                ApiError::from_transport(e, url, self.config.timeout_seconds)
            }
        })
    }
}

impl CollectionSource for ApiClient {
    async fn fetch(&self, kind: CollectionKind) -> Result<Value, ApiError> {
        let url = self.endpoint_url(kind);
        self.get_json(kind, &url).await
    }
}

/// Join a base URL and an endpoint path with exactly one slash between them.
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
