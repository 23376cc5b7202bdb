//! Access-URL refresh for stored descriptors.
//!
//! Stored remote descriptors are signed URLs that expire; at render time the
//! resolver re-derives a usable URL from the durable key embedded in them.
//! Resolution is strictly best-effort: a descriptor that cannot be improved
//! is returned unchanged rather than failing the render.

use courtside_core::Descriptor;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry2::RetryError;

use crate::ephemeral::EphemeralStore;
use crate::fetch::RemoteFetcher;
use crate::retry::{RetryPolicy, run_with_retry};
use crate::store::ObjectStore;

/// How the resolved value will be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Produce a fresh signed URL
    #[default]
    Normal,
    /// Fetch the bytes and hand back a process-local handle.
    ///
    /// Inline document viewers sometimes refuse signed URLs outright
    /// (cross-origin embedding); materializing the bytes locally sidesteps
    /// that.
    ForceDownload,
}

/// Extract the storage key embedded in an object-storage URL.
///
/// Recognizes virtual-hosted-style (`{bucket}.s3.{region}.amazonaws.com/{key}`)
/// and path-style (`s3.{region}.amazonaws.com/{bucket}/{key}`) shapes, and
/// unwraps third-party viewer URLs that carry the real URL in a `url` query
/// parameter. The signing query suffix is dropped along the way. Returns
/// `None` for URLs that carry no recognizable key.
pub fn extract_storage_key(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;

    // Viewer-wrapped shape: the real object URL rides in a query parameter.
    if let Some((_, inner)) = parsed.query_pairs().find(|(name, _)| name == "url") {
        if inner.starts_with("http://") || inner.starts_with("https://") {
            return extract_storage_key(&inner);
        }
    }

    let host = parsed.host_str()?;
    let path = parsed.path().trim_start_matches('/');
    if path.is_empty() {
        return None;
    }

    // Path-style: first path segment is the bucket.
    if host == "s3.amazonaws.com" || (host.starts_with("s3.") && host.ends_with(".amazonaws.com")) {
        let (_bucket, key) = path.split_once('/')?;
        return (!key.is_empty()).then(|| key.to_string());
    }

    // Virtual-hosted-style: bucket is a host label, the whole path is the key.
    if let Some(label_end) = host.find(".s3") {
        if label_end > 0 && host.ends_with(".amazonaws.com") {
            return Some(path.to_string());
        }
    }

    None
}

/// Refreshes stored descriptors into renderable URLs or handles.
pub struct AccessUrlResolver {
    store: Arc<dyn ObjectStore>,
    fetcher: Arc<dyn RemoteFetcher>,
    ephemeral: Arc<EphemeralStore>,
    presign_ttl: Duration,
    namespace_prefix: String,
}

impl AccessUrlResolver {
    /// Create a resolver.
    ///
    /// `namespace_prefix` is the segment some storage SDKs silently inject
    /// ahead of logical keys (conventionally `public`); the resolver only
    /// reaches for it when the bare key does not exist, so already-physical
    /// keys are never double-prefixed.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        fetcher: Arc<dyn RemoteFetcher>,
        ephemeral: Arc<EphemeralStore>,
        presign_ttl: Duration,
        namespace_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            fetcher,
            ephemeral,
            presign_ttl,
            namespace_prefix: namespace_prefix.into(),
        }
    }

    /// Refresh a stored descriptor for display.
    ///
    /// - inline descriptors pass through unchanged, with no I/O
    /// - ephemeral handles resolve to `None`: they died with the process
    ///   that minted them and the media should render as missing
    /// - remote descriptors are re-signed (or fetched and materialized in
    ///   forced-download mode); every failure degrades to the original
    ///   descriptor rather than an error
    #[tracing::instrument(skip(self, descriptor))]
    pub async fn refresh(&self, descriptor: &str, mode: ResolveMode) -> Option<String> {
        match Descriptor::classify(descriptor) {
            Descriptor::Inline(value) => Some(value),
            Descriptor::Ephemeral(handle) => {
                tracing::debug!(%handle, "stale ephemeral handle treated as missing");
                None
            }
            Descriptor::Remote(url) => Some(self.refresh_remote(&url, mode).await),
        }
    }

    async fn refresh_remote(&self, url: &str, mode: ResolveMode) -> String {
        let Some(extracted) = extract_storage_key(url) else {
            tracing::debug!(url, "no storage key recognized; returning descriptor unchanged");
            return url.to_string();
        };
        let key = self.locate_key(&extracted).await;

        match mode {
            ResolveMode::Normal => match self.store.presign_get(&key, self.presign_ttl).await {
                Ok(fresh) => fresh,
                Err(e) => {
                    tracing::warn!(key, error = %e, "presign failed; retrying as forced download");
                    self.materialize(&key, url).await.unwrap_or_else(|| url.to_string())
                }
            },
            ResolveMode::ForceDownload => {
                self.materialize(&key, url).await.unwrap_or_else(|| url.to_string())
            }
        }
    }

    /// Prefer the bare key; fall back to the namespaced form only when the
    /// bare key does not exist.
    async fn locate_key(&self, key: &str) -> String {
        match self.store.exists(key).await {
            Ok(true) => key.to_string(),
            Ok(false) | Err(_) => {
                let prefix = format!("{}/", self.namespace_prefix);
                if !key.starts_with(&prefix) {
                    let namespaced = format!("{}{}", prefix, key);
                    if let Ok(true) = self.store.exists(&namespaced).await {
                        return namespaced;
                    }
                }
                key.to_string()
            }
        }
    }

    /// Fetch the object's bytes and park them as an ephemeral handle.
    async fn materialize(&self, key: &str, original_url: &str) -> Option<String> {
        // A fresh signature is preferred for the fetch; the stored URL
        // (possibly stale) is the backstop.
        let fetch_url = match self.store.presign_get(key, self.presign_ttl).await {
            Ok(fresh) => fresh,
            Err(_) => original_url.to_string(),
        };

        let fetched = run_with_retry(RetryPolicy::once_more(), || {
            let fetcher = Arc::clone(&self.fetcher);
            let url = fetch_url.clone();
            async move {
                fetcher.fetch(&url).await.map_err(|err| RetryError::Transient {
                    err,
                    retry_after: None,
                })
            }
        })
        .await;

        match fetched {
            Ok(object) => Some(self.ephemeral.insert(object.bytes, object.content_type)),
            Err(e) => {
                tracing::warn!(key, error = %e, "forced download failed");
                None
            }
        }
    }
}
