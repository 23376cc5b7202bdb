//! Pipeline configuration and one-time runtime wiring.
//!
//! Configuration merges three layers, later ones winning: bundled defaults,
//! an optional `courtside.toml` next to the process, and `COURTSIDE_*`
//! environment variables. Runtime wiring (S3 client, HTTP client, identity
//! chain) happens once behind an idempotent `ensure_configured()` that every
//! public entry point may call freely.

use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use config::{Config, Environment, File, FileFormat};
use courtside_error::{ConfigError, CourtsideResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::credentials::{CredentialBroker, SdkCredentialBroker};
use crate::ephemeral::EphemeralStore;
use crate::fetch::{HttpFetcher, RemoteFetcher};
use crate::identity::{
    IdentityProvider, IdentityResolver, SessionEndpoint, TokenSource, UserinfoEndpoint,
};
use crate::pipeline::MediaIngestPipeline;
use crate::resolver::AccessUrlResolver;
use crate::store::{ObjectStore, S3ObjectStore};
use crate::uploader::BlobUploader;

const DEFAULT_CONFIG: &str = include_str!("../courtside.toml");

/// Media pipeline configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Destination bucket; absent means remote storage is not configured
    #[serde(default)]
    pub bucket: Option<String>,

    /// Storage region
    #[serde(default)]
    pub region: Option<String>,

    /// Custom S3-compatible endpoint (path-style addressed when set)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Cookie-session identity endpoint, tried first
    #[serde(default)]
    pub session_endpoint: Option<String>,

    /// Identity-provider userinfo endpoint, tried second
    #[serde(default)]
    pub userinfo_endpoint: Option<String>,

    /// Lifetime of issued access URLs
    pub presign_ttl_secs: u64,

    /// Inline fallback ceiling for video payloads, pre-encoding
    pub video_inline_ceiling_bytes: u64,

    /// Namespace segment some storage SDKs inject ahead of logical keys
    pub namespace_prefix: String,
}

impl MediaConfig {
    /// Load configuration from bundled defaults, user file, and environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a layer fails to parse.
    pub fn load() -> CourtsideResult<Self> {
        // Load .env before reading the environment layer; absence is normal.
        dotenvy::dotenv().ok();

        let merged = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::with_name("courtside").required(false))
            .add_source(Environment::with_prefix("COURTSIDE"))
            .build()
            .map_err(|e| ConfigError::new(format!("loading configuration: {}", e)))?;

        let config: Self = merged
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("deserializing configuration: {}", e)))?;

        tracing::debug!(
            bucket = config.bucket.as_deref().unwrap_or("<unset>"),
            "loaded media configuration"
        );
        Ok(config)
    }

    /// Access-URL lifetime as a [`Duration`].
    pub fn presign_ttl(&self) -> Duration {
        Duration::from_secs(self.presign_ttl_secs)
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .and_then(|merged| merged.try_deserialize())
            .unwrap_or(Self {
                bucket: None,
                region: None,
                endpoint: None,
                session_endpoint: None,
                userinfo_endpoint: None,
                presign_ttl_secs: 365 * 24 * 3600,
                video_inline_ceiling_bytes: 25 * 1024 * 1024,
                namespace_prefix: "public".to_string(),
            })
    }
}

static RUNTIME: OnceCell<MediaRuntime> = OnceCell::const_new();

/// Wired pipeline runtime: configuration plus the ingestion pipeline and
/// resolver built over it.
pub struct MediaRuntime {
    config: MediaConfig,
    pipeline: MediaIngestPipeline,
    resolver: AccessUrlResolver,
    ephemeral: Arc<EphemeralStore>,
}

impl MediaRuntime {
    /// Initialize the process-wide runtime once and return it.
    ///
    /// Safe to call from every public entry point; subsequent calls return
    /// the already-initialized runtime.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when loading or wiring fails.
    pub async fn ensure_configured() -> CourtsideResult<&'static MediaRuntime> {
        RUNTIME
            .get_or_try_init(|| async {
                let config = MediaConfig::load()?;
                MediaRuntime::from_config(config).await
            })
            .await
    }

    /// Wire a runtime from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the storage client cannot be built.
    pub async fn from_config(config: MediaConfig) -> CourtsideResult<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = config.region.clone() {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;

        let client = match &config.endpoint {
            Some(endpoint) => {
                let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                    .endpoint_url(endpoint.clone())
                    .force_path_style(true)
                    .build();
                Client::from_conf(s3_config)
            }
            None => Client::new(&sdk_config),
        };

        let store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::new(
            client,
            config.bucket.clone().unwrap_or_default(),
        ));
        let broker: Arc<dyn CredentialBroker> =
            Arc::new(SdkCredentialBroker::new(config.region.clone()));
        let http = reqwest::Client::new();

        let mut providers: Vec<Arc<dyn IdentityProvider>> = Vec::new();
        if let Some(url) = &config.session_endpoint {
            providers.push(Arc::new(SessionEndpoint::new(http.clone(), url.clone())));
        }
        if let Some(url) = &config.userinfo_endpoint {
            let tokens: Arc<dyn TokenSource> =
                Arc::new(|| std::env::var("COURTSIDE_ACCESS_TOKEN").ok());
            providers.push(Arc::new(UserinfoEndpoint::new(
                http.clone(),
                url.clone(),
                tokens,
            )));
        }

        let ephemeral = Arc::new(EphemeralStore::new());
        let fetcher: Arc<dyn RemoteFetcher> = Arc::new(HttpFetcher::new(http));

        let uploader = BlobUploader::new(
            Arc::clone(&store),
            broker,
            config.bucket.clone(),
            config.presign_ttl(),
        );
        let pipeline = MediaIngestPipeline::new(
            IdentityResolver::new(providers),
            uploader,
            config.video_inline_ceiling_bytes,
        );
        let resolver = AccessUrlResolver::new(
            store,
            fetcher,
            Arc::clone(&ephemeral),
            config.presign_ttl(),
            config.namespace_prefix.clone(),
        );

        Ok(Self {
            config,
            pipeline,
            resolver,
            ephemeral,
        })
    }

    /// The ingestion pipeline.
    pub fn pipeline(&self) -> &MediaIngestPipeline {
        &self.pipeline
    }

    /// The access-URL resolver.
    pub fn resolver(&self) -> &AccessUrlResolver {
        &self.resolver
    }

    /// The process-local handle store.
    pub fn ephemeral(&self) -> &Arc<EphemeralStore> {
        &self.ephemeral
    }

    /// The active configuration.
    pub fn config(&self) -> &MediaConfig {
        &self.config
    }
}
