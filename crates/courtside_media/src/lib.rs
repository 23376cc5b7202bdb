//! Media ingestion and URL-lifecycle pipeline for Courtside.
//!
//! This crate is the storage side of the Courtside social application: every
//! image, document, or video attached to a post, profile, team, or tournament
//! passes through here on its way into a record field, and every stored
//! descriptor passes back through here at render time to become a usable URL.
//!
//! # Ingestion
//!
//! The pipeline composes four pieces:
//!
//! - **Compression** ([`compress_image`]): bounded iterative JPEG
//!   recompression toward a byte ceiling within pixel bounds
//! - **Identity resolution** ([`IdentityResolver`]): session endpoint first,
//!   identity-provider userinfo second, absent otherwise
//! - **Remote upload** ([`BlobUploader`]): object storage under
//!   identity-namespaced keys, returning a long-lived presigned URL
//! - **Inline fallback** ([`encode_inline`]): `data:` URI encoding bounded by
//!   the persistence store's field ceiling
//!
//! Ingestion never returns an ephemeral handle; the only legal outcomes are a
//! remote URL, an inline payload, or a typed error.
//!
//! # Resolution
//!
//! [`AccessUrlResolver`] turns a stored descriptor back into something a
//! renderer can use: inline descriptors pass through untouched, remote URLs
//! are re-signed (or fetched and materialized as process-local handles in
//! forced-download mode), and dead ephemeral handles resolve to absent.
//!
//! # Example
//!
//! ```rust,ignore
//! use courtside_core::{MediaKind, MediaPayload};
//! use courtside_media::MediaRuntime;
//!
//! # async fn example(bytes: Vec<u8>) -> courtside_error::CourtsideResult<()> {
//! let runtime = MediaRuntime::ensure_configured().await?;
//! let descriptor = runtime
//!     .pipeline()
//!     .ingest_image(MediaPayload::new(
//!         bytes,
//!         MediaKind::Image,
//!         "image/jpeg",
//!         Some("team-photo.jpg".to_string()),
//!     ))
//!     .await?;
//! let display = runtime.resolver().refresh(&descriptor, Default::default()).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod compress;
mod config;
mod credentials;
mod ephemeral;
mod fetch;
mod identity;
mod inline;
mod pipeline;
mod policy;
mod resolver;
mod retry;
mod store;
mod uploader;

pub use compress::{CompressionTarget, compress_image, compress_image_blocking};
pub use config::{MediaConfig, MediaRuntime};
pub use credentials::{CredentialBroker, Credentials, SdkCredentialBroker};
pub use ephemeral::EphemeralStore;
pub use fetch::{FetchedObject, HttpFetcher, RemoteFetcher};
pub use identity::{
    IdentityProvider, IdentityResolver, SessionEndpoint, TokenSource, UserinfoEndpoint,
};
pub use inline::{encode_inline, encoded_ceiling_for_raw};
pub use pipeline::MediaIngestPipeline;
pub use policy::{
    DEGRADED_IMAGE_ENCODED_CEILING_BYTES, DEGRADED_IMAGE_TARGET, DOCUMENT_ENCODED_CEILING_BYTES,
    DOCUMENT_INLINE_CEILING_BYTES, IMAGE_COMPRESSION_THRESHOLD_BYTES, upload_compression_target,
};
pub use resolver::{AccessUrlResolver, ResolveMode, extract_storage_key};
pub use retry::{RetryPolicy, run_with_retry};
pub use store::{ObjectStore, S3ObjectStore};
pub use uploader::{BlobUploader, build_object_key, sanitize_file_name};
