//! Caller identity types.

/// Stable per-account identifier used to namespace remote storage keys.
///
/// This must be the account's durable subject id, never a mutable display
/// attribute such as an email address: storage paths must not depend on
/// values a user can change.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[display("{}", _0)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    /// Wrap a resolved subject id.
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    /// The raw subject id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CallerIdentity {
    fn from(subject: &str) -> Self {
        Self::new(subject)
    }
}
