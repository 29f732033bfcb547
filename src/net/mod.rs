//! HTTP transport for the source.
//!
//! This module provides the networking infrastructure, including:
//!
//! - **HTTP Client**: A global, configured reqwest client with connection pooling
//! - **Retry Logic**: Bounded retries with exponential backoff on connection errors and 429s
//! - **JSON**: Deserialization of response bodies into wire models
//!
//! # Examples
//!
//! ```rust
//! use tosho_mangaplus::net::HttpClient;
//!
//! # async fn example() -> tosho_mangaplus::Result<()> {
//! let client = HttpClient::new("mangaplus")
//!     .with_max_retries(3)
//!     .with_header("Referer", "https://mangaplus.shueisha.co.jp/");
//!
//! let json: serde_json::Value = client.get_json("https://api.example.com").await?;
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode, header::HeaderMap};
use std::time::Duration;
use tracing::{debug, warn};

/// Global HTTP client instance.
///
/// This client is configured with:
/// - 30-second timeout
/// - Connection pooling (10 idle connections per host)
/// - Compression support (gzip, brotli)
///
/// Per-source headers such as `User-Agent` and `Referer` are attached by
/// [`HttpClient`] on each request.
static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .gzip(true)
        .brotli(true)
        .build()
        .expect("Failed to build HTTP client")
});

/// HTTP client wrapper with retry logic and per-source headers.
///
/// Each client is associated with a specific source. It never throttles
/// requests; a call issues one request unless a retryable failure occurs.
#[derive(Clone, Debug)]
pub struct HttpClient {
    source_id: String,
    max_retries: u32,
    headers: HeaderMap,
}

impl HttpClient {
    /// Creates a new HTTP client for the specified source with 3 maximum retries.
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            max_retries: 3,
            headers: HeaderMap::new(),
        }
    }

    /// Sets the maximum number of retries for failed requests.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Adds a custom header to all requests made by this client.
    ///
    /// Invalid header names or values are ignored.
    ///
    /// ```rust
    /// use tosho_mangaplus::net::HttpClient;
    ///
    /// let client = HttpClient::new("source")
    ///     .with_header("User-Agent", "MyBot/1.0")
    ///     .with_header("Referer", "https://example.com");
    /// ```
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.parse::<reqwest::header::HeaderName>(),
            value.parse::<reqwest::header::HeaderValue>(),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Performs a GET request with automatic retry logic.
    ///
    /// 429 (Too Many Requests) responses and connection errors are retried up to
    /// the configured limit with exponential backoff. Any other non-success
    /// status fails immediately.
    ///
    /// # Errors
    ///
    /// * [`Error::Http`](crate::Error::Http) - For non-success statuses
    /// * [`Error::Network`](crate::Error::Network) - For network/connection errors
    pub async fn get(&self, url: &str) -> crate::Result<Bytes> {
        let mut attempts = 0;

        loop {
            debug!(source = %self.source_id, %url, attempt = attempts, "GET");

            match CLIENT.get(url).headers(self.headers.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.bytes().await?);
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS && attempts < self.max_retries {
                        attempts += 1;
                        let delay = Duration::from_secs(2_u64.pow(attempts));
                        warn!(source = %self.source_id, %url, ?delay, "Rate limited, retrying");
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Err(crate::Error::Http {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    if attempts < self.max_retries {
                        attempts += 1;
                        warn!(source = %self.source_id, %url, error = %e, "Request failed, retrying");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }

    /// Performs a GET request and deserializes the response as JSON.
    ///
    /// # Errors
    ///
    /// * All errors from [`get()`](HttpClient::get)
    /// * [`Error::Decode`](crate::Error::Decode) - If JSON parsing fails
    pub async fn get_json<T>(&self, url: &str) -> crate::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let bytes = self.get(url).await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }
}
