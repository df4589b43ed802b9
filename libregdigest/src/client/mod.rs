//! HTTP client shared by the HTTP-speaking backends.
//!
//! This module provides a thin client built on reqwest. It only performs GET
//! requests and hands the status and body back untouched: each backend
//! decides for itself what a 403 or a 404 means.

use crate::auth::Credentials;
use crate::config::Network;
use crate::error::{DigestError, Result};
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::debug;


/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libregdigest::client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(60)
///     .with_max_idle_per_host(20);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Maximum idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_idle_per_host: 10,
        }
    }
}

impl From<&Network> for ClientConfig {
    fn from(network: &Network) -> Self {
        Self {
            timeout_seconds: network.timeout,
            max_idle_per_host: network.max_idle_per_host,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the maximum idle connections per host.
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }
}

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP client rooted at a base URL.
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying HTTP client
    http_client: ReqwestClient,
    /// Base URL without trailing slash
    base_url: String,
    timeout_seconds: u64,
}

impl Client {
    /// Creates a new client for the base URL with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::client::Client;
    ///
    /// let client = Client::new("https://quay.io/api/v1/repository/").unwrap();
    /// assert_eq!(client.base_url(), "https://quay.io/api/v1/repository");
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, ClientConfig::default())
    }

    /// Creates a new client for the base URL with custom configuration.
    pub fn with_config(base_url: &str, config: ClientConfig) -> Result<Self> {
        let normalized_url = Self::normalize_url(base_url)?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| DigestError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            base_url: normalized_url,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Normalizes a URL by ensuring it has a scheme and removing trailing slashes.
    fn normalize_url(url: &str) -> Result<String> {
        let url = url.trim();

        if url.is_empty() {
            return Err(DigestError::validation("Base URL cannot be empty"));
        }

        let url = if !url.starts_with("http://") && !url.starts_with("https://") {
            format!("https://{}", url)
        } else {
            url.to_string()
        };

        Ok(url.trim_end_matches('/').to_string())
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins path segments onto the base URL with `/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libregdigest::client::Client;
    ///
    /// let client = Client::new("https://repo.example.com/artifactory").unwrap();
    /// assert_eq!(
    ///     client.url(&["api/storage", "docker/app/1.0/manifest.json"]),
    ///     "https://repo.example.com/artifactory/api/storage/docker/app/1.0/manifest.json"
    /// );
    /// ```
    pub fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            let segment = segment.trim_matches('/');
            if !segment.is_empty() {
                url.push('/');
                url.push_str(segment);
            }
        }
        url
    }

    /// Performs a GET request and returns the status and body.
    ///
    /// Only transport failures are errors here; any HTTP status is returned
    /// to the caller.
    pub async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        credentials: &Credentials,
    ) -> Result<HttpResponse> {
        debug!(url, "GET");

        let mut request = self.http_client.get(url).query(query);
        if let Some(auth_header) = credentials.to_header_value() {
            request = request.header("Authorization", auth_header);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e, url))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| DigestError::network_with_source(format!("Failed to read response from {}", url), e))?;

        debug!(url, status, bytes = body.len(), "response");

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }

    /// Translates a reqwest error into a DigestError.
    fn translate_reqwest_error(&self, error: reqwest::Error, url: &str) -> DigestError {
        if error.is_timeout() {
            DigestError::network(format!(
                "Request to {} timed out after {} seconds",
                url, self.timeout_seconds
            ))
        } else if error.is_connect() {
            DigestError::network_with_source(format!("Failed to connect to {}", url), error)
        } else if error.is_request() {
            DigestError::network_with_source(format!("Failed to send request to {}", url), error)
        } else {
            DigestError::network_with_source(
                format!("Network error communicating with {}", url),
                error,
            )
        }
    }
}
