//! Top-level error wrapper types.

use crate::{ConfigError, HttpError, MediaError, RecordError};

/// This is the foundation error enum for the Courtside workspace.
///
/// # Examples
///
/// ```
/// use courtside_error::{CourtsideError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: CourtsideError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CourtsideErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Media ingestion or resolution error
    #[from(MediaError)]
    Media(MediaError),
    /// Record boundary error
    #[from(RecordError)]
    Record(RecordError),
}

/// Courtside error with kind discrimination.
///
/// # Examples
///
/// ```
/// use courtside_error::{CourtsideResult, ConfigError};
///
/// fn might_fail() -> CourtsideResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Courtside Error: {}", _0)]
pub struct CourtsideError(Box<CourtsideErrorKind>);

impl CourtsideError {
    /// Create a new error from a kind.
    pub fn new(kind: CourtsideErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CourtsideErrorKind {
        &self.0
    }

    /// Get the media error kind, if this is a media error.
    ///
    /// Ingestion callers use this to branch on the typed taxonomy without
    /// matching the full wrapper chain.
    pub fn media_kind(&self) -> Option<&crate::MediaErrorKind> {
        match self.kind() {
            CourtsideErrorKind::Media(e) => Some(&e.kind),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to CourtsideErrorKind
impl<T> From<T> for CourtsideError
where
    T: Into<CourtsideErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Courtside operations.
///
/// # Examples
///
/// ```
/// use courtside_error::{CourtsideResult, HttpError};
///
/// fn fetch_data() -> CourtsideResult<String> {
///     Err(HttpError::new("404 Not Found"))?
/// }
/// ```
pub type CourtsideResult<T> = std::result::Result<T, CourtsideError>;
