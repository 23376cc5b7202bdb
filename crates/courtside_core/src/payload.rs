//! Transient media payload types.

use crate::MediaKind;

/// A media payload selected by the caller, consumed by one ingestion call.
///
/// The payload is created from user file selection, handed to the pipeline
/// once, and never retained after ingestion completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    /// Raw bytes of the media
    pub bytes: Vec<u8>,
    /// Kind of media (image, document, video)
    pub kind: MediaKind,
    /// MIME type (e.g., "image/jpeg", "application/pdf")
    pub mime_type: String,
    /// Original file name (if available)
    pub file_name: Option<String>,
}

impl MediaPayload {
    /// Create a new payload.
    pub fn new(
        bytes: Vec<u8>,
        kind: MediaKind,
        mime_type: impl Into<String>,
        file_name: Option<String>,
    ) -> Self {
        Self {
            bytes,
            kind,
            mime_type: mime_type.into(),
            file_name,
        }
    }

    /// Raw payload size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// File name with a kind-appropriate default when the caller gave none.
    pub fn file_name_or_default(&self) -> String {
        self.file_name.clone().unwrap_or_else(|| {
            format!("upload.{}", extension_for(&self.mime_type, self.kind))
        })
    }
}

fn extension_for(mime_type: &str, kind: MediaKind) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "application/pdf" => "pdf",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        _ => match kind {
            MediaKind::Image => "jpg",
            MediaKind::Document => "pdf",
            MediaKind::Video => "mp4",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_name_follows_mime_type() {
        let payload = MediaPayload::new(vec![1, 2, 3], MediaKind::Image, "image/png", None);
        assert_eq!(payload.file_name_or_default(), "upload.png");
    }

    #[test]
    fn unknown_mime_type_falls_back_to_kind() {
        let payload =
            MediaPayload::new(vec![1], MediaKind::Video, "application/octet-stream", None);
        assert_eq!(payload.file_name_or_default(), "upload.mp4");
    }
}
