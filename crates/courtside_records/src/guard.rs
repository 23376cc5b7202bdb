//! Write-path descriptor guard.

use courtside_core::Descriptor;
use courtside_error::{CourtsideResult, MediaError, MediaErrorKind};

/// Refuse descriptors that must never be persisted.
///
/// The ingestion pipeline already rejects ephemeral handles before returning;
/// this guard repeats the check at the write path so a caller bug that
/// bypasses ingestion still cannot store a handle that dies with the process.
///
/// # Errors
///
/// Returns `InvalidDescriptor` for ephemeral-scheme values.
pub fn ensure_persistable(descriptor: &str) -> CourtsideResult<()> {
    if !Descriptor::classify(descriptor).is_persistable() {
        return Err(MediaError::new(MediaErrorKind::InvalidDescriptor(
            descriptor.to_string(),
        ))
        .into());
    }
    Ok(())
}
