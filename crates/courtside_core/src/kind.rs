//! Media kind enumeration.

/// Kind of media a record slot can hold.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Image content (JPEG, PNG, WebP, etc.)
    #[display("image")]
    Image,
    /// Document content (PDF)
    #[display("document")]
    Document,
    /// Video content (MP4, WebM, etc.)
    #[display("video")]
    Video,
}

impl MediaKind {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Document => "document",
            MediaKind::Video => "video",
        }
    }

    /// Plural path segment used in remote storage keys.
    ///
    /// Keys are laid out as `{identity}/{segment}/{timestamp}-{name}`.
    pub fn key_segment(&self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Document => "documents",
            MediaKind::Video => "videos",
        }
    }

    /// Default MIME type assumed when the caller supplies none.
    pub fn default_mime_type(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/jpeg",
            MediaKind::Document => "application/pdf",
            MediaKind::Video => "video/mp4",
        }
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaKind::Image),
            "document" => Ok(MediaKind::Document),
            "video" => Ok(MediaKind::Video),
            _ => Err(format!("Unknown media kind: {}", s)),
        }
    }
}
