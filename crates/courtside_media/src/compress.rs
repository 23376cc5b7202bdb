//! Bounded iterative image recompression.
//!
//! Compression aims a decoded image at a byte ceiling within pixel bounds by
//! walking quality down in fixed steps, then shrinking dimensions and
//! resuming, under a hard attempt budget. The search always terminates and
//! never fails once the image has decoded: when both floors are reached or
//! the budget is spent, the latest result is accepted as-is.

use courtside_error::{CourtsideResult, MediaError, MediaErrorKind};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use std::io::Cursor;

/// Constraints for one compression run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionTarget {
    /// Byte ceiling the encoded result should fit under
    pub max_size_bytes: u64,
    /// Maximum output width in pixels
    pub max_width: u32,
    /// Maximum output height in pixels
    pub max_height: u32,
    /// JPEG quality to start from, in `0.0..=1.0`
    pub initial_quality: f32,
}

/// Lowest quality the search will try before shrinking dimensions.
const QUALITY_FLOOR: f32 = 0.05;
/// Fixed quality decrement per attempt.
const QUALITY_STEP: f32 = 0.05;
/// Quality to resume from after a dimension shrink.
const QUALITY_RESET: f32 = 0.5;
/// Dimensions are never shrunk below this.
const DIMENSION_FLOOR: u32 = 400;
/// Per-shrink scale factor.
const SHRINK_FACTOR: f32 = 0.9;
/// Total encode attempts before the current result is accepted as-is.
const MAX_ATTEMPTS: u32 = 10;

/// Compress an image toward `target`, off the async pool.
///
/// Decode and encode are CPU-bound, so the work runs under
/// `spawn_blocking`; see [`compress_image_blocking`] for the algorithm.
///
/// # Errors
///
/// Returns a decode failure if the bytes are not a readable image.
pub async fn compress_image(bytes: Vec<u8>, target: CompressionTarget) -> CourtsideResult<Vec<u8>> {
    tokio::task::spawn_blocking(move || compress_image_blocking(&bytes, &target))
        .await
        .map_err(|e| {
            MediaError::new(MediaErrorKind::Service(format!("compression task failed: {}", e)))
        })?
}

/// Synchronous compression entry point.
///
/// Scales the decoded image proportionally into the pixel bounds, encodes at
/// the initial quality, then reduces quality in [`QUALITY_STEP`] decrements
/// down to [`QUALITY_FLOOR`]; once quality bottoms out, shrinks both
/// dimensions by 10% (never below [`DIMENSION_FLOOR`]), resets quality to
/// [`QUALITY_RESET`], and resumes. Terminates when the size target is met,
/// both floors are reached, or [`MAX_ATTEMPTS`] encodes have run; the last
/// two accept the final result rather than failing.
///
/// # Errors
///
/// Returns `DecodeFailure` if the bytes cannot be decoded as an image.
#[tracing::instrument(skip(bytes), fields(input_size = bytes.len()))]
pub fn compress_image_blocking(
    bytes: &[u8],
    target: &CompressionTarget,
) -> CourtsideResult<Vec<u8>> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| MediaError::new(MediaErrorKind::DecodeFailure(e.to_string())))?;

    let mut current =
        if decoded.width() > target.max_width || decoded.height() > target.max_height {
            decoded.resize(target.max_width, target.max_height, FilterType::Lanczos3)
        } else {
            decoded
        };

    let mut quality = target.initial_quality.clamp(QUALITY_FLOOR, 1.0);
    let mut encoded = encode_jpeg(&current, quality)?;

    for attempt in 1..MAX_ATTEMPTS {
        if encoded.len() as u64 <= target.max_size_bytes {
            break;
        }

        if quality - QUALITY_STEP >= QUALITY_FLOOR - 1e-4 {
            quality -= QUALITY_STEP;
        } else if current.width() > DIMENSION_FLOOR && current.height() > DIMENSION_FLOOR {
            let width = ((current.width() as f32 * SHRINK_FACTOR) as u32).max(DIMENSION_FLOOR);
            let height = ((current.height() as f32 * SHRINK_FACTOR) as u32).max(DIMENSION_FLOOR);
            current = current.resize_exact(width, height, FilterType::Lanczos3);
            quality = QUALITY_RESET;
        } else {
            // Both floors reached; accept what we have.
            break;
        }

        encoded = encode_jpeg(&current, quality)?;
        tracing::trace!(
            attempt,
            quality,
            width = current.width(),
            height = current.height(),
            size = encoded.len(),
            "compression attempt"
        );
    }

    tracing::debug!(
        input_size = bytes.len(),
        output_size = encoded.len(),
        width = current.width(),
        height = current.height(),
        "compressed image"
    );

    Ok(encoded)
}

fn encode_jpeg(image: &DynamicImage, quality: f32) -> CourtsideResult<Vec<u8>> {
    let quality = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    // JPEG has no alpha channel; flatten before encoding.
    let rgb = image.to_rgb8();
    rgb.write_with_encoder(encoder)
        .map_err(|e| MediaError::new(MediaErrorKind::Service(format!("JPEG encode: {}", e))))?;

    Ok(buffer.into_inner())
}
