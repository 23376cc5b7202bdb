//! Inline `data:` URI encoding with a hard size ceiling.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use courtside_core::{EPHEMERAL_SCHEME, MediaPayload};
use courtside_error::{CourtsideResult, MediaError, MediaErrorKind};

/// Size of the base64 body a raw payload of `raw_bytes` encodes to.
///
/// base64 expands 3 bytes to 4, padded to a multiple of 4, so a 300 KiB
/// document lands exactly on a 400 KiB ceiling.
pub fn encoded_ceiling_for_raw(raw_bytes: u64) -> u64 {
    raw_bytes.div_ceil(3) * 4
}

/// Encode a payload as a self-contained `data:` URI.
///
/// The encoded body is what the persistence store's field-size limit bounds,
/// so results whose base64 body exceeds `max_encoded_bytes` fail rather than
/// truncate.
///
/// # Errors
///
/// - `SizeExceeded` when the encoded body is over the ceiling
/// - `InvalidDescriptor` when handed an ephemeral handle instead of bytes
#[tracing::instrument(skip(payload), fields(kind = %payload.kind, size = payload.size_bytes()))]
pub fn encode_inline(payload: &MediaPayload, max_encoded_bytes: u64) -> CourtsideResult<String> {
    // Only genuine binary payloads are legal here; a handle string that crept
    // into the byte buffer would encode into a permanently dead descriptor.
    if payload.bytes.starts_with(EPHEMERAL_SCHEME.as_bytes()) {
        return Err(MediaError::new(MediaErrorKind::InvalidDescriptor(
            "inline encoding requires raw bytes, not an ephemeral handle".to_string(),
        ))
        .into());
    }

    let body = STANDARD.encode(&payload.bytes);
    if body.len() as u64 > max_encoded_bytes {
        return Err(MediaError::new(MediaErrorKind::SizeExceeded {
            actual: body.len() as u64,
            limit: max_encoded_bytes,
        })
        .into());
    }

    tracing::debug!(encoded_size = body.len(), "encoded payload inline");
    Ok(format!("data:{};base64,{}", payload.mime_type, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_core::MediaKind;

    fn payload(bytes: Vec<u8>) -> MediaPayload {
        MediaPayload::new(bytes, MediaKind::Document, "application/pdf", None)
    }

    #[test]
    fn encodes_within_ceiling() {
        let encoded = encode_inline(&payload(vec![0u8; 300]), 1024).unwrap();
        assert!(encoded.starts_with("data:application/pdf;base64,"));
    }

    #[test]
    fn over_ceiling_fails_with_sizes() {
        let err = encode_inline(&payload(vec![0u8; 3000]), 1024).unwrap_err();
        match err.media_kind() {
            Some(MediaErrorKind::SizeExceeded { actual, limit }) => {
                assert!(*actual > 1024);
                assert_eq!(*limit, 1024);
            }
            other => panic!("expected SizeExceeded, got {:?}", other),
        }
    }

    #[test]
    fn body_size_matches_the_closed_form() {
        for raw in [0u64, 1, 2, 3, 299, 300, 301, 4096, 300 * 1024] {
            let p = payload(vec![0u8; raw as usize]);
            let encoded = encode_inline(&p, u64::MAX).unwrap();
            let body = encoded.split(',').nth(1).unwrap();
            assert_eq!(body.len() as u64, encoded_ceiling_for_raw(raw), "raw {}", raw);
        }
    }

    #[test]
    fn document_at_exact_raw_ceiling_fits_the_hard_limit() {
        let p = payload(vec![0u8; 300 * 1024]);
        assert!(encode_inline(&p, 400 * 1024).is_ok());
        let over = payload(vec![0u8; 300 * 1024 + 1]);
        assert!(encode_inline(&over, 400 * 1024).is_err());
    }

    #[test]
    fn ephemeral_handle_bytes_are_rejected() {
        let err = encode_inline(&payload(b"mem://deadbeef".to_vec()), 1024).unwrap_err();
        assert!(matches!(
            err.media_kind(),
            Some(MediaErrorKind::InvalidDescriptor(_))
        ));
    }
}
