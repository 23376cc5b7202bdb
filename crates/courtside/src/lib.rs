//! Courtside - media ingestion and URL lifecycle for a social application
//!
//! Courtside's records (timeline posts, profiles, teams, tournaments) carry
//! media in plain descriptor fields. This facade re-exports the workspace
//! surface that fills and reads those fields:
//!
//! - **Ingestion**: compression, identity resolution, remote upload, and the
//!   bounded inline fallback, composed behind three operations (image,
//!   document, video)
//! - **Resolution**: turning stored descriptors back into fresh signed URLs
//!   or process-local handles at render time
//! - **Records**: the record types, the write-path descriptor guard, and the
//!   store abstraction
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use courtside::{MediaKind, MediaPayload, MediaRuntime};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     courtside::init_telemetry()?;
//!     let runtime = MediaRuntime::ensure_configured().await?;
//!
//!     let descriptor = runtime
//!         .pipeline()
//!         .ingest_image(MediaPayload::new(
//!             std::fs::read("team-photo.jpg")?,
//!             MediaKind::Image,
//!             "image/jpeg",
//!             Some("team-photo.jpg".to_string()),
//!         ))
//!         .await?;
//!     println!("stored as {descriptor}");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The workspace is organized as focused crates:
//!
//! - `courtside_error` - error types
//! - `courtside_core` - media kinds, payloads, descriptors, identity
//! - `courtside_media` - the ingestion pipeline and access-URL resolver
//! - `courtside_records` - record types and the write boundary
//!
//! This crate (`courtside`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use courtside_core::{
    CallerIdentity, Descriptor, EPHEMERAL_SCHEME, INLINE_SCHEME, MediaKind, MediaPayload,
    init_telemetry,
};
pub use courtside_error::{
    ConfigError, CourtsideError, CourtsideErrorKind, CourtsideResult, HttpError, MediaError,
    MediaErrorKind, RecordError, RecordErrorKind,
};
pub use courtside_media::{
    AccessUrlResolver, BlobUploader, CompressionTarget, CredentialBroker, Credentials,
    EphemeralStore, FetchedObject, HttpFetcher, IdentityProvider, IdentityResolver,
    MediaConfig, MediaIngestPipeline, MediaRuntime, ObjectStore, RemoteFetcher, ResolveMode,
    RetryPolicy, S3ObjectStore, SdkCredentialBroker, SessionEndpoint, TokenSource,
    UserinfoEndpoint, compress_image, encode_inline, extract_storage_key, run_with_retry,
    sanitize_file_name,
};
pub use courtside_records::{
    MediaBoundary, MemoryRecordStore, Post, RecordStore, Team, Tournament, UserProfile,
    ensure_persistable,
};
