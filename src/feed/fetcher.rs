//! Feed retrieval over HTTP(S).
//!
//! One GET per source, no retries — a failed source is reported once
//! per batch run and tried again on the next run. The batch level
//! deliberately fetches one feed at a time, so a single bounded
//! request is all this module needs.

use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

/// Default per-fetch timeout. Expiry is a retrieval failure, not a hang.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum feed document size (10MB). Guards against memory exhaustion
/// from a misbehaving server.
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024;

/// Errors that can occur while retrieving one feed document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
}

/// Fetches feed documents with a bounded timeout and body size.
///
/// Holds no per-source state; the same fetcher is reused for every
/// source in a batch.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Fetcher { client, timeout }
    }

    /// Performs a single GET and returns the raw document bytes.
    ///
    /// Any transport failure, timeout, non-2xx status, or oversized
    /// body is returned as a [`FetchError`] value — nothing escapes
    /// this boundary as a panic or unhandled error.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        // Fast path: reject via Content-Length before reading anything.
        if let Some(len) = response.content_length() {
            if len as usize > MAX_FEED_SIZE {
                return Err(FetchError::ResponseTooLarge);
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(FetchError::Network)?;
            if bytes.len().saturating_add(chunk.len()) > MAX_FEED_SIZE {
                return Err(FetchError::ResponseTooLarge);
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }
}
