//! Persisted media descriptor classification.

/// Scheme prefix of ephemeral, process-local handles.
///
/// A value with this prefix is valid only for the lifetime of the process
/// that minted it and is never legal to persist into a record field.
pub const EPHEMERAL_SCHEME: &str = "mem://";

/// Scheme prefix of self-contained inline-encoded payloads.
pub const INLINE_SCHEME: &str = "data:";

/// Where a stored media slot points.
///
/// Record fields hold descriptors as plain strings; this classification is
/// how the pipeline and the write path decide what a stored value means.
///
/// # Examples
///
/// ```
/// use courtside_core::Descriptor;
///
/// let remote = Descriptor::classify("https://bucket.s3.us-east-1.amazonaws.com/u1/images/x.jpg");
/// assert!(remote.is_persistable());
///
/// let ephemeral = Descriptor::classify("mem://6dfc17e2");
/// assert!(!ephemeral.is_persistable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Descriptor {
    /// Remote object-storage URL; the storage key is recoverable from it
    #[display("{}", _0)]
    Remote(String),
    /// Self-contained `data:` URI embedded in the owning record
    #[display("{}", _0)]
    Inline(String),
    /// Process-local handle; never legal to persist
    #[display("{}", _0)]
    Ephemeral(String),
}

impl Descriptor {
    /// Classify a stored descriptor string by its scheme.
    pub fn classify(value: &str) -> Self {
        if value.starts_with(INLINE_SCHEME) {
            Descriptor::Inline(value.to_string())
        } else if value.starts_with(EPHEMERAL_SCHEME) {
            Descriptor::Ephemeral(value.to_string())
        } else {
            Descriptor::Remote(value.to_string())
        }
    }

    /// Whether this descriptor may be written into a record field.
    ///
    /// Ephemeral handles die with the process that minted them, so a
    /// persisted one would render as permanently missing media.
    pub fn is_persistable(&self) -> bool {
        !matches!(self, Descriptor::Ephemeral(_))
    }

    /// The raw descriptor string.
    pub fn as_str(&self) -> &str {
        match self {
            Descriptor::Remote(s) | Descriptor::Inline(s) | Descriptor::Ephemeral(s) => s,
        }
    }

    /// Consume the descriptor, returning the raw string.
    pub fn into_string(self) -> String {
        match self {
            Descriptor::Remote(s) | Descriptor::Inline(s) | Descriptor::Ephemeral(s) => s,
        }
    }
}
