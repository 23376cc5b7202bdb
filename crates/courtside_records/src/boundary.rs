//! Entry points record-writing code uses to ingest and resolve media.

use courtside_core::{MediaKind, MediaPayload};
use courtside_error::CourtsideResult;
use courtside_media::{AccessUrlResolver, MediaIngestPipeline, ResolveMode};

use crate::guard::ensure_persistable;

/// The media side of the record boundary.
///
/// Record mutations call [`MediaBoundary::ingest_image`] (and friends)
/// before building their payload and store the returned descriptor directly
/// in the record field; record listings call
/// [`MediaBoundary::resolve_for_display`] once per media slot before handing
/// the value to a renderer.
pub struct MediaBoundary<'a> {
    pipeline: &'a MediaIngestPipeline,
    resolver: &'a AccessUrlResolver,
}

impl<'a> MediaBoundary<'a> {
    /// Bind the boundary to a pipeline and resolver.
    pub fn new(pipeline: &'a MediaIngestPipeline, resolver: &'a AccessUrlResolver) -> Self {
        Self { pipeline, resolver }
    }

    /// Ingest an image and return the descriptor to store.
    ///
    /// # Errors
    ///
    /// Propagates pipeline errors; additionally rejects any descriptor that
    /// is not legal to persist.
    pub async fn ingest_image(&self, bytes: Vec<u8>, file_name: Option<String>) -> CourtsideResult<String> {
        self.ingest(bytes, MediaKind::Image, file_name).await
    }

    /// Ingest a document and return the descriptor to store.
    ///
    /// # Errors
    ///
    /// Propagates pipeline errors; additionally rejects any descriptor that
    /// is not legal to persist.
    pub async fn ingest_document(&self, bytes: Vec<u8>, file_name: Option<String>) -> CourtsideResult<String> {
        self.ingest(bytes, MediaKind::Document, file_name).await
    }

    /// Ingest a video and return the descriptor to store.
    ///
    /// # Errors
    ///
    /// Propagates pipeline errors; additionally rejects any descriptor that
    /// is not legal to persist.
    pub async fn ingest_video(&self, bytes: Vec<u8>, file_name: Option<String>) -> CourtsideResult<String> {
        self.ingest(bytes, MediaKind::Video, file_name).await
    }

    async fn ingest(
        &self,
        bytes: Vec<u8>,
        kind: MediaKind,
        file_name: Option<String>,
    ) -> CourtsideResult<String> {
        let mime_type = kind.default_mime_type();
        let payload = MediaPayload::new(bytes, kind, mime_type, file_name);
        let descriptor = match kind {
            MediaKind::Image => self.pipeline.ingest_image(payload).await?,
            MediaKind::Document => self.pipeline.ingest_document(payload).await?,
            MediaKind::Video => self.pipeline.ingest_video(payload).await?,
        };
        ensure_persistable(&descriptor)?;
        Ok(descriptor)
    }

    /// Resolve a stored descriptor into a displayable URL or handle.
    ///
    /// Returns `None` when the referenced media is gone and should render as
    /// missing.
    pub async fn resolve_for_display(
        &self,
        descriptor: &str,
        force_download: bool,
    ) -> Option<String> {
        let mode = if force_download {
            ResolveMode::ForceDownload
        } else {
            ResolveMode::Normal
        };
        self.resolver.refresh(descriptor, mode).await
    }
}
