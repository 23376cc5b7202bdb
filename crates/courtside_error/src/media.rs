//! Media pipeline error types.

/// Kinds of media ingestion and resolution errors.
///
/// Callers branch on these variants rather than inspecting message text;
/// every size-related variant carries the actual and allowed sizes so the
/// message stays actionable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MediaErrorKind {
    /// Source bytes could not be decoded as the expected media kind
    #[display("Failed to decode media: {}", _0)]
    DecodeFailure(String),
    /// Remote object store has no configured destination bucket
    #[display("No storage bucket is configured; configure storage or shrink the file")]
    StorageNotConfigured,
    /// No resolvable caller identity and the payload is too large for inline fallback
    #[display(
        "Sign-in required to upload {actual} bytes (inline limit is {limit} bytes)"
    )]
    AuthenticationRequired {
        /// Size of the payload that needed a remote upload
        actual: u64,
        /// Inline ceiling that the payload exceeded
        limit: u64,
    },
    /// Identity resolved but temporary upload credentials could not be obtained
    #[display("Failed to obtain upload credentials: {}", _0)]
    CredentialExchange(String),
    /// Encoded inline form exceeds the persistence store's field ceiling
    #[display("Encoded payload is {actual} bytes, over the {limit} byte ceiling")]
    SizeExceeded {
        /// Encoded size that was produced
        actual: u64,
        /// Maximum encoded size allowed
        limit: u64,
    },
    /// Raw payload exceeds the applicable ceiling with no remote path available
    #[display("Payload is {actual} bytes, over the {limit} byte ceiling")]
    PayloadTooLarge {
        /// Raw payload size
        actual: u64,
        /// Maximum raw size allowed
        limit: u64,
    },
    /// An ephemeral handle reached a point where only a durable descriptor is legal
    #[display("Ephemeral handle is not a durable descriptor: {}", _0)]
    InvalidDescriptor(String),
    /// Transient storage service failure
    #[display("Storage service failure: {}", _0)]
    Service(String),
}

/// Media error with location tracking.
///
/// # Examples
///
/// ```
/// use courtside_error::{MediaError, MediaErrorKind};
///
/// let err = MediaError::new(MediaErrorKind::StorageNotConfigured);
/// assert!(format!("{}", err).contains("bucket"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Media Error: {} at line {} in {}", kind, line, file)]
pub struct MediaError {
    /// The kind of error that occurred
    pub kind: MediaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MediaError {
    /// Create a new media error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MediaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
