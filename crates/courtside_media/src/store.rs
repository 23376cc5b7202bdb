//! Object storage backend.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use courtside_error::{CourtsideResult, MediaError, MediaErrorKind};
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Longest signature validity the storage service accepts (7 days).
///
/// Configured TTLs above this are clamped at presign time; descriptors stay
/// re-presignable forever because the key is recoverable from the URL.
pub const MAX_PRESIGN_SECS: u64 = 7 * 24 * 3600;

/// Remote object storage operations the pipeline needs.
///
/// The pipeline and resolver depend on this seam rather than the SDK client
/// so tests can inject failures at each step.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object under `key`.
    async fn put_object(&self, key: &str, bytes: &[u8], content_type: &str) -> CourtsideResult<()>;

    /// Produce a time-bounded signed GET URL for `key`.
    async fn presign_get(&self, key: &str, expires_in: Duration) -> CourtsideResult<String>;

    /// Whether an object exists under `key`.
    async fn exists(&self, key: &str) -> CourtsideResult<bool>;
}

/// S3-backed object store.
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Wrap a configured client and bucket.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// The bucket this store writes to.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[tracing::instrument(skip(self, bytes), fields(bucket = %self.bucket, size = bytes.len()))]
    async fn put_object(&self, key: &str, bytes: &[u8], content_type: &str) -> CourtsideResult<()> {
        let digest = format!("{:x}", Sha256::digest(bytes));

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes.to_vec()))
            .content_type(content_type)
            .metadata("content-sha256", &digest)
            .send()
            .await
            .map_err(|e| {
                MediaError::new(MediaErrorKind::Service(format!("put {}: {}", key, e)))
            })?;

        tracing::info!(key, digest = %digest, "stored object");
        Ok(())
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> CourtsideResult<String> {
        let clamped = Duration::from_secs(expires_in.as_secs().min(MAX_PRESIGN_SECS));
        let presigning = PresigningConfig::expires_in(clamped).map_err(|e| {
            MediaError::new(MediaErrorKind::Service(format!("presign config: {}", e)))
        })?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                MediaError::new(MediaErrorKind::Service(format!("presign {}: {}", key, e)))
            })?;

        Ok(request.uri().to_string())
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket))]
    async fn exists(&self, key: &str) -> CourtsideResult<bool> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(service_err))
                if matches!(service_err.err(), HeadObjectError::NotFound(_)) =>
            {
                Ok(false)
            }
            Err(e) => Err(MediaError::new(MediaErrorKind::Service(format!(
                "head {}: {}",
                key, e
            )))
            .into()),
        }
    }
}
