//! Media ingestion orchestration.
//!
//! The three public ingestion operations share one linear decision tree;
//! only the kind-specific thresholds differ. Every call ends in exactly one
//! of three outcomes: a remote access URL, an inline `data:` payload, or a
//! typed error, never an ephemeral handle.

use courtside_core::{Descriptor, MediaKind, MediaPayload};
use courtside_error::{CourtsideResult, MediaError, MediaErrorKind};

use crate::compress::compress_image;
use crate::identity::IdentityResolver;
use crate::inline::{encode_inline, encoded_ceiling_for_raw};
use crate::policy::{
    DEGRADED_IMAGE_ENCODED_CEILING_BYTES, DEGRADED_IMAGE_TARGET, DOCUMENT_ENCODED_CEILING_BYTES,
    DOCUMENT_INLINE_CEILING_BYTES, IMAGE_COMPRESSION_THRESHOLD_BYTES, upload_compression_target,
};
use crate::uploader::BlobUploader;

/// Orchestrates compression, identity resolution, remote upload, and inline
/// fallback into the public ingestion operations.
pub struct MediaIngestPipeline {
    identity: IdentityResolver,
    uploader: BlobUploader,
    video_inline_ceiling_bytes: u64,
}

impl MediaIngestPipeline {
    /// Assemble a pipeline from its parts.
    pub fn new(
        identity: IdentityResolver,
        uploader: BlobUploader,
        video_inline_ceiling_bytes: u64,
    ) -> Self {
        Self {
            identity,
            uploader,
            video_inline_ceiling_bytes,
        }
    }

    /// Ingest an image payload, returning the descriptor to persist.
    ///
    /// Images over the compression threshold are recompressed before upload,
    /// with aggressiveness scaled to the original size.
    #[tracing::instrument(skip(self, payload), fields(size = payload.size_bytes()))]
    pub async fn ingest_image(&self, payload: MediaPayload) -> CourtsideResult<String> {
        let payload = self.precompress(payload).await;
        self.ingest(payload).await
    }

    /// Ingest a document payload, returning the descriptor to persist.
    ///
    /// Documents are never compressed.
    #[tracing::instrument(skip(self, payload), fields(size = payload.size_bytes()))]
    pub async fn ingest_document(&self, payload: MediaPayload) -> CourtsideResult<String> {
        self.ingest(payload).await
    }

    /// Ingest a video payload, returning the descriptor to persist.
    ///
    /// Videos are never compressed.
    #[tracing::instrument(skip(self, payload), fields(size = payload.size_bytes()))]
    pub async fn ingest_video(&self, payload: MediaPayload) -> CourtsideResult<String> {
        self.ingest(payload).await
    }

    /// Recompress an oversized image for the primary upload path.
    ///
    /// Compression is best-effort: a payload that fails to recompress is
    /// uploaded as-is rather than blocking the ingestion.
    async fn precompress(&self, payload: MediaPayload) -> MediaPayload {
        if payload.kind != MediaKind::Image
            || payload.size_bytes() <= IMAGE_COMPRESSION_THRESHOLD_BYTES
        {
            return payload;
        }

        let target = upload_compression_target(payload.size_bytes());
        match compress_image(payload.bytes.clone(), target).await {
            Ok(bytes) => {
                tracing::debug!(
                    from = payload.size_bytes(),
                    to = bytes.len(),
                    "recompressed image for upload"
                );
                MediaPayload {
                    bytes,
                    mime_type: "image/jpeg".to_string(),
                    ..payload
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "image recompression failed; uploading original");
                payload
            }
        }
    }

    async fn ingest(&self, payload: MediaPayload) -> CourtsideResult<String> {
        let descriptor = match self.identity.resolve().await {
            None => {
                if !self.inline_eligible(&payload) {
                    return Err(MediaError::new(MediaErrorKind::AuthenticationRequired {
                        actual: payload.size_bytes(),
                        limit: self.inline_raw_ceiling(payload.kind),
                    })
                    .into());
                }
                tracing::info!(kind = %payload.kind, "no caller identity; storing inline");
                self.inline_fallback(&payload).await.map_err(|e| {
                    // An unauthenticated payload that cannot fit inline has no
                    // path forward until the caller signs in.
                    if let Some(MediaErrorKind::SizeExceeded { actual, limit }) = e.media_kind() {
                        let (actual, limit) = (*actual, *limit);
                        return MediaError::new(MediaErrorKind::AuthenticationRequired {
                            actual,
                            limit,
                        })
                        .into();
                    }
                    e
                })?
            }
            Some(identity) => match self.uploader.upload(&payload, &identity).await {
                Ok(url) => url,
                Err(e) if self.inline_eligible(&payload) => {
                    tracing::warn!(error = %e, kind = %payload.kind, "remote upload failed; storing inline");
                    self.inline_fallback(&payload).await?
                }
                Err(e) => return Err(e),
            },
        };

        // Nothing below the write path can repair an ephemeral descriptor;
        // reject it here before it reaches a record.
        if !Descriptor::classify(&descriptor).is_persistable() {
            return Err(MediaError::new(MediaErrorKind::InvalidDescriptor(descriptor)).into());
        }
        Ok(descriptor)
    }

    /// Whether this payload may be stored inline when upload is unavailable.
    fn inline_eligible(&self, payload: &MediaPayload) -> bool {
        match payload.kind {
            // Images always get a shot: the degraded path recompresses them
            // down to fit and fails with a typed error if it cannot.
            MediaKind::Image => true,
            MediaKind::Document => payload.size_bytes() <= DOCUMENT_INLINE_CEILING_BYTES,
            MediaKind::Video => payload.size_bytes() <= self.video_inline_ceiling_bytes,
        }
    }

    fn inline_raw_ceiling(&self, kind: MediaKind) -> u64 {
        match kind {
            MediaKind::Image => DEGRADED_IMAGE_ENCODED_CEILING_BYTES,
            MediaKind::Document => DOCUMENT_INLINE_CEILING_BYTES,
            MediaKind::Video => self.video_inline_ceiling_bytes,
        }
    }

    /// Encode the payload inline under its kind's ceiling.
    ///
    /// Images are first recompressed to small dimensions so the encoded form
    /// fits a record field; documents and videos encode as-is.
    async fn inline_fallback(&self, payload: &MediaPayload) -> CourtsideResult<String> {
        match payload.kind {
            MediaKind::Image => {
                let degraded = compress_image(payload.bytes.clone(), DEGRADED_IMAGE_TARGET).await?;
                let degraded = MediaPayload {
                    bytes: degraded,
                    mime_type: "image/jpeg".to_string(),
                    ..payload.clone()
                };
                encode_inline(&degraded, DEGRADED_IMAGE_ENCODED_CEILING_BYTES)
            }
            MediaKind::Document => {
                if payload.size_bytes() > DOCUMENT_INLINE_CEILING_BYTES {
                    return Err(MediaError::new(MediaErrorKind::PayloadTooLarge {
                        actual: payload.size_bytes(),
                        limit: DOCUMENT_INLINE_CEILING_BYTES,
                    })
                    .into());
                }
                encode_inline(payload, DOCUMENT_ENCODED_CEILING_BYTES)
            }
            MediaKind::Video => {
                if payload.size_bytes() > self.video_inline_ceiling_bytes {
                    return Err(MediaError::new(MediaErrorKind::PayloadTooLarge {
                        actual: payload.size_bytes(),
                        limit: self.video_inline_ceiling_bytes,
                    })
                    .into());
                }
                encode_inline(
                    payload,
                    encoded_ceiling_for_raw(self.video_inline_ceiling_bytes),
                )
            }
        }
    }
}
