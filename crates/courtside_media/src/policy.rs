//! Numeric policy for ingestion: compression tiers and inline ceilings.

use crate::CompressionTarget;

/// Images at or below this size upload as-is; larger ones are recompressed first.
pub const IMAGE_COMPRESSION_THRESHOLD_BYTES: u64 = 1024 * 1024;

/// Byte ceiling the primary-path recompression aims for before upload.
///
/// The dimension and quality tiers below carry the aggressiveness; the size
/// target itself is a single bound for every tier.
pub const UPLOAD_TARGET_BYTES: u64 = 5 * 1024 * 1024;

/// Hard ceiling on an inline-encoded document, imposed by the persistence
/// store's field-size limit.
pub const DOCUMENT_ENCODED_CEILING_BYTES: u64 = 400 * 1024;

/// Raw document size eligible for inline fallback.
///
/// Leaves headroom under [`DOCUMENT_ENCODED_CEILING_BYTES`] for the ~33%
/// base64 expansion.
pub const DOCUMENT_INLINE_CEILING_BYTES: u64 = 300 * 1024;

/// Encoded ceiling for an image on the degraded inline path.
pub const DEGRADED_IMAGE_ENCODED_CEILING_BYTES: u64 = 100 * 1024;

/// Recompression target for the degraded image path: small dimensions and
/// mid quality so the encoded form fits a record field.
pub const DEGRADED_IMAGE_TARGET: CompressionTarget = CompressionTarget {
    max_size_bytes: 75 * 1024,
    max_width: 600,
    max_height: 600,
    initial_quality: 0.6,
};

const MIB: u64 = 1024 * 1024;

/// Pick the primary-path compression target for an original of `size` bytes.
///
/// Larger originals compress more aggressively: smaller maximum dimension
/// and lower starting quality.
pub fn upload_compression_target(size: u64) -> CompressionTarget {
    let (max_dim, quality) = if size > 100 * MIB {
        (1920, 0.70)
    } else if size > 50 * MIB {
        (2560, 0.75)
    } else if size > 20 * MIB {
        (3840, 0.80)
    } else {
        (4096, 0.85)
    };
    CompressionTarget {
        max_size_bytes: UPLOAD_TARGET_BYTES,
        max_width: max_dim,
        max_height: max_dim,
        initial_quality: quality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_get_more_aggressive_with_size() {
        let small = upload_compression_target(2 * MIB);
        let large = upload_compression_target(120 * MIB);
        assert!(large.max_width < small.max_width);
        assert!(large.initial_quality < small.initial_quality);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(upload_compression_target(20 * MIB).max_width, 4096);
        assert_eq!(upload_compression_target(20 * MIB + 1).max_width, 3840);
        assert_eq!(upload_compression_target(50 * MIB + 1).max_width, 2560);
        assert_eq!(upload_compression_target(100 * MIB + 1).max_width, 1920);
    }
}
