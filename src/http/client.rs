//! HTTP client with retry and rate limiting
//!
//! All upstream traffic funnels through [`ApiClient::request`], which:
//! - resolves the collection id to an API path under the base endpoint
//! - retries rate-limit (429) and gateway (502) responses with
//!   exponential backoff up to a fixed attempt ceiling
//! - maps 403 to the recoverable [`Error::Forbidden`] variant
//! - propagates every other non-2xx as a fatal error with the status

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::config::ConnectorConfig;
use crate::error::{is_retryable_status, Error, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Base endpoint for the Zendesk Chat (Zopim) API
pub const BASE_URL: &str = "https://www.zopim.com";

const MAX_RETRIES: u32 = 10;
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Configuration for a single API request
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    /// Query parameters
    pub query: HashMap<String, String>,
    /// Explicit URL overriding base-endpoint resolution (used to follow
    /// opaque next-page links)
    pub url: Option<String>,
    /// Suffix appended to the collection path (e.g. "/search")
    pub suffix: String,
}

impl ApiRequest {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Set an explicit URL
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set a path suffix
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

/// HTTP client for the Zendesk Chat API
pub struct ApiClient {
    client: Client,
    base_url: String,
    rate_limiter: Option<RateLimiter>,
    max_retries: u32,
}

impl ApiClient {
    /// Create a client from connector configuration
    pub fn new(config: &ConnectorConfig) -> Result<Self> {
        Self::with_base_url(config, BASE_URL)
    }

    /// Create a client against a non-default base endpoint
    pub fn with_base_url(config: &ConnectorConfig, base_url: impl Into<String>) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!(
            "Bearer {}",
            config.access_token
        ))
        .map_err(|e| Error::config(format!("invalid access_token: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()?;

        let rate_limiter = (config.requests_per_second > 0).then(|| {
            RateLimiter::new(&RateLimiterConfig::new(
                config.requests_per_second,
                config.requests_per_second,
            ))
        });

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter,
            max_retries: MAX_RETRIES,
        })
    }

    /// Make a GET request for a collection and parse the JSON body
    pub async fn request(&self, collection_id: &str, req: ApiRequest) -> Result<Value> {
        let url = match &req.url {
            Some(explicit) => explicit.clone(),
            None => format!("{}/api/v2/{}{}", self.base_url, collection_id, req.suffix),
        };

        let mut attempt = 0;
        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            debug!("calling {url} {:?}", req.query);
            let mut builder = self.client.get(&url);
            if !req.query.is_empty() {
                builder = builder.query(&req.query);
            }
            let response = builder.send().await?;
            let status = response.status();

            if is_retryable_status(status.as_u16()) {
                if attempt < self.max_retries {
                    let delay = backoff_delay(attempt);
                    warn!(
                        "upstream returned {}, attempt {}/{}, retrying in {:?}",
                        status.as_u16(),
                        attempt + 1,
                        self.max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                if status == StatusCode::TOO_MANY_REQUESTS {
                    return Err(Error::RateLimited {
                        retry_after_seconds: extract_retry_after(&response),
                    });
                }
                return Err(Error::MaxRetriesExceeded {
                    max_retries: self.max_retries,
                });
            }

            if status == StatusCode::FORBIDDEN {
                return Err(Error::forbidden(collection_id));
            }

            if status == StatusCode::BAD_REQUEST {
                warn!(
                    "400 from {collection_id}: the search endpoint caps out at 251 pages; \
                     reduce the search window for this collection"
                );
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::http_status(status.as_u16(), body));
            }

            info!("GET {url} -> {}", status.as_u16());
            return Ok(response.json().await?);
        }
    }

    /// Backoff attempt ceiling
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[cfg(test)]
    pub(crate) fn set_max_retries(&mut self, retries: u32) {
        self.max_retries = retries;
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Exponential backoff delay for a given attempt
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    std::cmp::min(INITIAL_BACKOFF * factor, MAX_BACKOFF)
}

/// Extract retry-after header value
fn extract_retry_after(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(60)
}
