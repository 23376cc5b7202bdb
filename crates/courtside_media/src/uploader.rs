//! Remote blob upload under identity-namespaced keys.

use chrono::{DateTime, Utc};
use courtside_core::{CallerIdentity, MediaPayload};
use courtside_error::{CourtsideResult, MediaError, MediaErrorKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio_retry2::RetryError;

use crate::credentials::CredentialBroker;
use crate::retry::{RetryPolicy, run_with_retry};
use crate::store::ObjectStore;

/// Replace every character outside `[A-Za-z0-9.-]` with `_`.
///
/// Keys embed the original file name; sanitizing it keeps keys safe for URLs
/// and the storage backend without needing any coordination.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Build the storage key for an upload.
///
/// Layout: `{identity}/{kind-plural}/{timestamp}-{sanitized-name}`. The
/// identity segment scopes every caller to their own namespace; the
/// millisecond timestamp makes keys lexicographically time-ordered and
/// collision-resistant without coordination.
pub fn build_object_key(
    identity: &CallerIdentity,
    payload: &MediaPayload,
    at: DateTime<Utc>,
) -> String {
    format!(
        "{}/{}/{}-{}",
        identity.as_str(),
        payload.kind.key_segment(),
        at.timestamp_millis(),
        sanitize_file_name(&payload.file_name_or_default()),
    )
}

/// Uploads payloads to remote object storage and returns a long-lived
/// signed access URL as the stored descriptor.
pub struct BlobUploader {
    store: Arc<dyn ObjectStore>,
    broker: Arc<dyn CredentialBroker>,
    bucket: Option<String>,
    presign_ttl: Duration,
}

impl BlobUploader {
    /// Create an uploader.
    ///
    /// `bucket` is the configured destination; `None` means storage is not
    /// configured and every upload fails with `StorageNotConfigured`.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        broker: Arc<dyn CredentialBroker>,
        bucket: Option<String>,
        presign_ttl: Duration,
    ) -> Self {
        Self {
            store,
            broker,
            bucket,
            presign_ttl,
        }
    }

    /// Upload a payload for `identity` and return its access URL.
    ///
    /// Verifies the bucket is configured and that upload credentials can be
    /// obtained (retrying the exchange once with a forced refresh) before
    /// writing. Transient service failures are not retried here; fallback
    /// policy belongs to the ingestion pipeline.
    ///
    /// # Errors
    ///
    /// - `StorageNotConfigured` when no bucket is configured
    /// - `CredentialExchange` when the exchange fails even after a forced refresh
    /// - `Service` for upload or presign failures
    #[tracing::instrument(skip(self, payload), fields(kind = %payload.kind, size = payload.size_bytes()))]
    pub async fn upload(
        &self,
        payload: &MediaPayload,
        identity: &CallerIdentity,
    ) -> CourtsideResult<String> {
        if self.bucket.is_none() {
            return Err(MediaError::new(MediaErrorKind::StorageNotConfigured).into());
        }

        self.verify_credentials().await?;

        let key = build_object_key(identity, payload, Utc::now());
        self.store
            .put_object(&key, &payload.bytes, &payload.mime_type)
            .await?;

        let url = self.store.presign_get(&key, self.presign_ttl).await?;
        tracing::info!(key, "uploaded payload");
        Ok(url)
    }

    /// Preflight the credential exchange, forcing a refresh on the retry.
    async fn verify_credentials(&self) -> CourtsideResult<()> {
        let refreshed = AtomicBool::new(false);
        run_with_retry(RetryPolicy::once_more(), || {
            // First attempt uses any cached exchange; the single retry forces
            // a refresh.
            let force_refresh = refreshed.swap(true, Ordering::SeqCst);
            let broker = Arc::clone(&self.broker);
            async move {
                broker.credentials(force_refresh).await.map(|_| ()).map_err(|err| {
                    RetryError::Transient {
                        err,
                        retry_after: None,
                    }
                })
            }
        })
        .await
        .map_err(|e| {
            if matches!(e.media_kind(), Some(MediaErrorKind::CredentialExchange(_))) {
                e
            } else {
                MediaError::new(MediaErrorKind::CredentialExchange(e.to_string())).into()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Credentials;
    use async_trait::async_trait;
    use courtside_core::MediaKind;
    use std::sync::atomic::AtomicUsize;

    fn payload(name: Option<&str>) -> MediaPayload {
        MediaPayload::new(
            vec![1, 2, 3],
            MediaKind::Image,
            "image/jpeg",
            name.map(str::to_string),
        )
    }

    #[test]
    fn sanitizes_everything_outside_allowed_set() {
        assert_eq!(
            sanitize_file_name("team photo (1) ÿ.jpg"),
            "team_photo__1___.jpg"
        );
        assert_eq!(sanitize_file_name("ok-name.2.png"), "ok-name.2.png");
    }

    #[test]
    fn key_is_identity_scoped_and_time_ordered() {
        let identity = CallerIdentity::new("user-123");
        let p = payload(Some("net.jpg"));
        let earlier = build_object_key(&identity, &p, Utc::now());
        let later = build_object_key(
            &identity,
            &p,
            Utc::now() + chrono::Duration::milliseconds(5),
        );

        assert!(earlier.starts_with("user-123/images/"));
        assert!(later.starts_with("user-123/images/"));
        assert_ne!(earlier, later);
        assert!(earlier < later);
    }

    struct NullStore;

    #[async_trait]
    impl crate::store::ObjectStore for NullStore {
        async fn put_object(&self, _: &str, _: &[u8], _: &str) -> CourtsideResult<()> {
            Ok(())
        }

        async fn presign_get(&self, key: &str, _: Duration) -> CourtsideResult<String> {
            Ok(format!("https://bucket.s3.us-east-1.amazonaws.com/{}?sig=x", key))
        }

        async fn exists(&self, _: &str) -> CourtsideResult<bool> {
            Ok(true)
        }
    }

    struct CountingBroker {
        calls: AtomicUsize,
        fail_first: bool,
    }

    #[async_trait]
    impl CredentialBroker for CountingBroker {
        async fn credentials(&self, force_refresh: bool) -> CourtsideResult<Credentials> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            // The retry must arrive with force_refresh set.
            if call > 0 {
                assert!(force_refresh);
            }
            if self.fail_first && call == 0 {
                return Err(MediaError::new(MediaErrorKind::CredentialExchange(
                    "stale".to_string(),
                ))
                .into());
            }
            Ok(Credentials {
                access_key_id: "AKID".to_string(),
                secret_access_key: "secret".to_string(),
                session_token: None,
                expires_at: None,
            })
        }
    }

    #[tokio::test]
    async fn missing_bucket_is_storage_not_configured() {
        let uploader = BlobUploader::new(
            Arc::new(NullStore),
            Arc::new(CountingBroker {
                calls: AtomicUsize::new(0),
                fail_first: false,
            }),
            None,
            Duration::from_secs(60),
        );
        let err = uploader
            .upload(&payload(None), &CallerIdentity::new("u"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.media_kind(),
            Some(MediaErrorKind::StorageNotConfigured)
        ));
    }

    #[tokio::test]
    async fn credential_exchange_retries_once_with_refresh() {
        let broker = Arc::new(CountingBroker {
            calls: AtomicUsize::new(0),
            fail_first: true,
        });
        let uploader = BlobUploader::new(
            Arc::new(NullStore),
            Arc::clone(&broker) as Arc<dyn CredentialBroker>,
            Some("media".to_string()),
            Duration::from_secs(60),
        );

        let url = uploader
            .upload(&payload(Some("a.jpg")), &CallerIdentity::new("user-9"))
            .await
            .unwrap();

        assert_eq!(broker.calls.load(Ordering::SeqCst), 2);
        assert!(url.contains("user-9/images/"));
    }

    #[tokio::test]
    async fn exhausted_exchange_is_credential_error() {
        struct AlwaysStale;

        #[async_trait]
        impl CredentialBroker for AlwaysStale {
            async fn credentials(&self, _: bool) -> CourtsideResult<Credentials> {
                Err(MediaError::new(MediaErrorKind::CredentialExchange(
                    "expired".to_string(),
                ))
                .into())
            }
        }

        let uploader = BlobUploader::new(
            Arc::new(NullStore),
            Arc::new(AlwaysStale),
            Some("media".to_string()),
            Duration::from_secs(60),
        );
        let err = uploader
            .upload(&payload(None), &CallerIdentity::new("u"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.media_kind(),
            Some(MediaErrorKind::CredentialExchange(_))
        ));
    }
}
