//! HTTP tile fetcher backed by reqwest.

use super::{FetchError, TileFetcher};
use bytes::Bytes;
use std::time::Duration;

/// Default request timeout for tile fetches.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Production tile fetcher using a pooled async HTTP client.
///
/// Error classification:
/// - timeouts, connection failures, request transport errors → transient
/// - 5xx responses → transient (the service may recover)
/// - 4xx and any other non-success status → permanent
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Create a fetcher with the default timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a fetcher with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::ClientConstruction(e.to_string()))?;

        Ok(Self { client })
    }
}

impl TileFetcher for ReqwestFetcher {
    async fn fetch(&self, address: &str) -> Result<Bytes, FetchError> {
        let response = self.client.get(address).send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() || e.is_request() {
                FetchError::transient(address, e.to_string())
            } else {
                FetchError::permanent(address, e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(FetchError::transient(address, format!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(FetchError::permanent(address, format!("HTTP {}", status)));
        }

        response
            .bytes()
            .await
            .map_err(|e| FetchError::transient(address, e.to_string()))
    }
}
