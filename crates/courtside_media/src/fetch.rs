//! Direct object fetch for forced-download resolution.

use async_trait::async_trait;
use courtside_error::{CourtsideResult, HttpError};

/// Bytes fetched from a remote URL, with their advertised content type.
#[derive(Debug, Clone)]
pub struct FetchedObject {
    /// Object bytes
    pub bytes: Vec<u8>,
    /// Content type reported by the server
    pub content_type: String,
}

/// Fetches remote object bytes directly.
///
/// Used by forced-download resolution, which bypasses viewer and CORS
/// restrictions that signed URLs sometimes hit for inline document
/// rendering by materializing the bytes locally instead.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Fetch the object at `url`.
    async fn fetch(&self, url: &str) -> CourtsideResult<FetchedObject>;
}

/// Reqwest-backed fetcher.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher over the given client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &str) -> CourtsideResult<FetchedObject> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("fetch {}: {}", url, e)))?
            .error_for_status()
            .map_err(|e| HttpError::new(format!("fetch {}: {}", url, e)))?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(format!("fetch body {}: {}", url, e)))?
            .to_vec();

        tracing::debug!(size = bytes.len(), content_type = %content_type, "fetched object");
        Ok(FetchedObject {
            bytes,
            content_type,
        })
    }
}
