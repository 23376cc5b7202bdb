//! Temporary upload credential exchange.
//!
//! Uploads run with short-lived credentials exchanged for the caller's
//! session. The broker seam lets the uploader verify, before touching the
//! wire, that an exchange is possible at all; the S3-backed implementation
//! wraps the SDK's provider chain and supports a forced reload for the
//! uploader's single refresh-and-retry attempt.

use async_trait::async_trait;
use aws_sdk_s3::config::{ProvideCredentials, Region, SharedCredentialsProvider};
use chrono::{DateTime, Utc};
use courtside_error::{CourtsideResult, MediaError, MediaErrorKind};
use tokio::sync::Mutex;

/// Temporary credentials usable for one upload session.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Access key id
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Session token, when the credentials are session-scoped
    pub session_token: Option<String>,
    /// When the credentials lapse, if known
    pub expires_at: Option<DateTime<Utc>>,
}

/// Exchanges the caller's ambient identity for temporary storage credentials.
#[async_trait]
pub trait CredentialBroker: Send + Sync {
    /// Obtain credentials, rebuilding any cached exchange when
    /// `force_refresh` is set.
    async fn credentials(&self, force_refresh: bool) -> CourtsideResult<Credentials>;
}

/// Broker backed by the SDK's default provider chain.
pub struct SdkCredentialBroker {
    region: Option<String>,
    cached: Mutex<Option<SharedCredentialsProvider>>,
}

impl SdkCredentialBroker {
    /// Create a broker for the given region (falls back to the ambient one).
    pub fn new(region: Option<String>) -> Self {
        Self {
            region,
            cached: Mutex::new(None),
        }
    }

    async fn provider(&self, force_refresh: bool) -> CourtsideResult<SharedCredentialsProvider> {
        let mut cached = self.cached.lock().await;
        if force_refresh || cached.is_none() {
            let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
            if let Some(region) = &self.region {
                loader = loader.region(Region::new(region.clone()));
            }
            let sdk_config = loader.load().await;
            *cached = sdk_config.credentials_provider();
            tracing::debug!(force_refresh, "reloaded credential provider chain");
        }
        cached.clone().ok_or_else(|| {
            MediaError::new(MediaErrorKind::CredentialExchange(
                "no credential provider available in this environment".to_string(),
            ))
            .into()
        })
    }
}

#[async_trait]
impl CredentialBroker for SdkCredentialBroker {
    #[tracing::instrument(skip(self))]
    async fn credentials(&self, force_refresh: bool) -> CourtsideResult<Credentials> {
        let provider = self.provider(force_refresh).await?;
        let credentials = provider.provide_credentials().await.map_err(|e| {
            MediaError::new(MediaErrorKind::CredentialExchange(e.to_string()))
        })?;

        Ok(Credentials {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().map(str::to_string),
            expires_at: credentials.expiry().map(DateTime::<Utc>::from),
        })
    }
}
