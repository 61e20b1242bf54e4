//! # HTTP Fetch Port
//!
//! Discovery documents and key sets are retrieved through [`HttpFetcher`],
//! so tests and alternative transports can stand in for the network.
//! [`ReqwestFetcher`] is the production implementation.
//!
//! Fetched URLs come from unverified `iss` claims, so bodies are read up to
//! a fixed limit and larger responses are rejected without buffering them.
//! Dropping a returned future aborts the in-flight request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT};
use url::Url;

use crate::config::DEFAULT_HTTP_MAX_BODY_BYTES;
use crate::error::OidcError;

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Response body.
    pub body: Vec<u8>,
    /// Response headers, used for provider fingerprinting.
    pub headers: HeaderMap,
    /// Final URL after redirects.
    pub url: Url,
}

/// Transport for discovery and JWKS requests.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// GET `url`. Non-success statuses are errors.
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<HttpResponse, OidcError>;
}

/// [`HttpFetcher`] over a `reqwest` client.
pub struct ReqwestFetcher {
    http: reqwest::Client,
    max_body_bytes: usize,
}

impl ReqwestFetcher {
    /// Client with a per-request `timeout` and the default body limit.
    pub fn new(timeout: Duration) -> Result<Self, OidcError> {
        Self::with_limit(timeout, DEFAULT_HTTP_MAX_BODY_BYTES)
    }

    /// Client with a per-request `timeout` that rejects bodies larger than
    /// `max_body_bytes`.
    pub fn with_limit(timeout: Duration, max_body_bytes: usize) -> Result<Self, OidcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OidcError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            max_body_bytes,
        })
    }

    /// Wrap an existing client, keeping the default body limit.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self {
            http,
            max_body_bytes: DEFAULT_HTTP_MAX_BODY_BYTES,
        }
    }

    fn too_large(&self, url: &str) -> OidcError {
        OidcError::Http(format!(
            "GET {url}: response body exceeds {} bytes",
            self.max_body_bytes
        ))
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<HttpResponse, OidcError> {
        tracing::debug!(url, "GET");
        let mut response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .headers(headers.clone())
            .send()
            .await
            .map_err(|e| OidcError::Http(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OidcError::Http(format!("GET {url} returned {status}")));
        }

        let limit = self.max_body_bytes;
        if let Some(declared) = response.content_length() {
            if declared > limit as u64 {
                return Err(self.too_large(url));
            }
        }

        let headers = response.headers().clone();
        let final_url = response.url().clone();

        // Content-Length may be absent or wrong; count what actually arrives.
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| OidcError::Http(format!("GET {url}: reading body: {e}")))?
        {
            if body.len() + chunk.len() > limit {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(HttpResponse {
            body,
            headers,
            url: final_url,
        })
    }
}
