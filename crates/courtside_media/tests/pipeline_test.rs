//! Ingestion pipeline decision-tree tests with fakes at the trait seams.

use async_trait::async_trait;
use courtside_core::{CallerIdentity, MediaKind, MediaPayload};
use courtside_error::{CourtsideResult, MediaError, MediaErrorKind};
use courtside_media::{
    BlobUploader, CredentialBroker, Credentials, IdentityProvider, IdentityResolver,
    MediaIngestPipeline, ObjectStore, extract_storage_key,
};
use image::{DynamicImage, ImageBuffer, Rgb};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const VIDEO_CEILING: u64 = 25 * 1024 * 1024;

struct FixedIdentity(Option<&'static str>);

#[async_trait]
impl IdentityProvider for FixedIdentity {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn current_identity(&self) -> CourtsideResult<Option<CallerIdentity>> {
        Ok(self.0.map(CallerIdentity::new))
    }
}

#[derive(Default)]
struct FakeStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_puts: bool,
}

impl FakeStore {
    fn failing() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            fail_puts: true,
        }
    }

    fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn put_object(&self, key: &str, bytes: &[u8], _: &str) -> CourtsideResult<()> {
        if self.fail_puts {
            return Err(MediaError::new(MediaErrorKind::Service("put refused".to_string())).into());
        }
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn presign_get(&self, key: &str, _: Duration) -> CourtsideResult<String> {
        Ok(format!(
            "https://media.s3.us-east-1.amazonaws.com/{}?X-Amz-Signature=test",
            key
        ))
    }

    async fn exists(&self, key: &str) -> CourtsideResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }
}

struct OkBroker;

#[async_trait]
impl CredentialBroker for OkBroker {
    async fn credentials(&self, _: bool) -> CourtsideResult<Credentials> {
        Ok(Credentials {
            access_key_id: "AKID".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: None,
            expires_at: None,
        })
    }
}

fn pipeline_with(
    identity: Option<&'static str>,
    store: Arc<FakeStore>,
    bucket: Option<&str>,
) -> MediaIngestPipeline {
    let uploader = BlobUploader::new(
        store,
        Arc::new(OkBroker),
        bucket.map(str::to_string),
        Duration::from_secs(3600),
    );
    MediaIngestPipeline::new(
        IdentityResolver::new(vec![Arc::new(FixedIdentity(identity))]),
        uploader,
        VIDEO_CEILING,
    )
}

fn jpeg_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x / 4 + y / 4) % 256) as u8])
    });
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, image::ImageFormat::Jpeg)
        .unwrap();
    buffer.into_inner()
}

fn document(size: usize) -> MediaPayload {
    MediaPayload::new(
        vec![0xAB; size],
        MediaKind::Document,
        "application/pdf",
        Some("roster.pdf".to_string()),
    )
}

#[tokio::test]
async fn authenticated_image_uploads_remotely() {
    let store = Arc::new(FakeStore::default());
    let pipeline = pipeline_with(Some("user-1"), Arc::clone(&store), Some("media"));

    let payload = MediaPayload::new(
        jpeg_fixture(200, 160),
        MediaKind::Image,
        "image/jpeg",
        Some("warmup.jpg".to_string()),
    );
    let descriptor = pipeline.ingest_image(payload).await.unwrap();

    assert!(descriptor.starts_with("https://"));
    assert!(descriptor.contains("user-1/images/"));
    assert_eq!(store.keys().len(), 1);
}

#[tokio::test]
async fn upload_key_round_trips_through_extraction() {
    let store = Arc::new(FakeStore::default());
    let pipeline = pipeline_with(Some("user-7"), Arc::clone(&store), Some("media"));

    let descriptor = pipeline
        .ingest_image(MediaPayload::new(
            jpeg_fixture(120, 90),
            MediaKind::Image,
            "image/jpeg",
            Some("bracket.jpg".to_string()),
        ))
        .await
        .unwrap();

    // The key recovered from the issued URL is the key that was stored,
    // signing suffix aside.
    let extracted = extract_storage_key(&descriptor).unwrap();
    assert_eq!(store.keys(), vec![extracted]);
}

#[tokio::test]
async fn unauthenticated_document_at_ceiling_goes_inline() {
    let store = Arc::new(FakeStore::default());
    let pipeline = pipeline_with(None, store, Some("media"));

    let descriptor = pipeline
        .ingest_document(document(300 * 1024))
        .await
        .unwrap();
    assert!(descriptor.starts_with("data:application/pdf;base64,"));
}

#[tokio::test]
async fn unauthenticated_document_over_ceiling_needs_sign_in() {
    let store = Arc::new(FakeStore::default());
    let pipeline = pipeline_with(None, store, Some("media"));

    let err = pipeline
        .ingest_document(document(300 * 1024 + 1))
        .await
        .unwrap_err();
    match err.media_kind() {
        Some(MediaErrorKind::AuthenticationRequired { actual, limit }) => {
            assert_eq!(*actual, 300 * 1024 + 1);
            assert_eq!(*limit, 300 * 1024);
        }
        other => panic!("expected AuthenticationRequired, got {:?}", other),
    }
}

#[tokio::test]
async fn storage_not_configured_degrades_small_image_to_inline() {
    let store = Arc::new(FakeStore::default());
    // No bucket: every upload fails with StorageNotConfigured.
    let pipeline = pipeline_with(Some("user-2"), store, None);

    let descriptor = pipeline
        .ingest_image(MediaPayload::new(
            jpeg_fixture(1600, 1200),
            MediaKind::Image,
            "image/jpeg",
            Some("team.jpg".to_string()),
        ))
        .await
        .unwrap();

    assert!(descriptor.starts_with("data:image/jpeg;base64,"));
    let body = descriptor.split(',').nth(1).unwrap();
    assert!(body.len() as u64 <= 100 * 1024);

    // The degraded path also shrank the pixels, not just the bytes.
    use base64::Engine as _;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(body)
        .unwrap();
    let reloaded = image::load_from_memory(&bytes).unwrap();
    assert!(reloaded.width() <= 600);
    assert!(reloaded.height() <= 600);
}

#[tokio::test]
async fn storage_not_configured_fails_outright_for_large_document() {
    let store = Arc::new(FakeStore::default());
    let pipeline = pipeline_with(Some("user-3"), store, None);

    let err = pipeline
        .ingest_document(document(512 * 1024))
        .await
        .unwrap_err();
    assert!(matches!(
        err.media_kind(),
        Some(MediaErrorKind::StorageNotConfigured)
    ));
}

#[tokio::test]
async fn transient_upload_failure_falls_back_by_size() {
    let store = Arc::new(FakeStore::failing());
    let pipeline = pipeline_with(Some("user-4"), store, Some("media"));

    // Small document: degrade to inline.
    let descriptor = pipeline.ingest_document(document(10 * 1024)).await.unwrap();
    assert!(descriptor.starts_with("data:application/pdf;base64,"));

    // Oversized document: the upload error propagates.
    let err = pipeline
        .ingest_document(document(512 * 1024))
        .await
        .unwrap_err();
    assert!(matches!(err.media_kind(), Some(MediaErrorKind::Service(_))));
}

#[tokio::test]
async fn video_over_inline_ceiling_propagates_upload_failure() {
    let store = Arc::new(FakeStore::failing());
    let pipeline = pipeline_with(Some("user-5"), store, Some("media"));

    let payload = MediaPayload::new(
        vec![0u8; (VIDEO_CEILING + 1) as usize],
        MediaKind::Video,
        "video/mp4",
        Some("final.mp4".to_string()),
    );
    let err = pipeline.ingest_video(payload).await.unwrap_err();
    assert!(matches!(err.media_kind(), Some(MediaErrorKind::Service(_))));
}

#[tokio::test]
async fn small_video_falls_back_inline() {
    let store = Arc::new(FakeStore::failing());
    let pipeline = pipeline_with(Some("user-6"), store, Some("media"));

    let payload = MediaPayload::new(
        vec![0u8; 64 * 1024],
        MediaKind::Video,
        "video/mp4",
        None,
    );
    let descriptor = pipeline.ingest_video(payload).await.unwrap();
    assert!(descriptor.starts_with("data:video/mp4;base64,"));
}

#[tokio::test]
async fn ephemeral_descriptor_from_backend_is_rejected() {
    // A backend that hands back an ephemeral handle instead of a URL must
    // not have that value reach the caller.
    struct HandleReturningStore;

    #[async_trait]
    impl ObjectStore for HandleReturningStore {
        async fn put_object(&self, _: &str, _: &[u8], _: &str) -> CourtsideResult<()> {
            Ok(())
        }

        async fn presign_get(&self, _: &str, _: Duration) -> CourtsideResult<String> {
            Ok("mem://0f3c5a52-9d4e-4a7b-8f21-3e1d2c4b5a69".to_string())
        }

        async fn exists(&self, _: &str) -> CourtsideResult<bool> {
            Ok(true)
        }
    }

    let uploader = BlobUploader::new(
        Arc::new(HandleReturningStore),
        Arc::new(OkBroker),
        Some("media".to_string()),
        Duration::from_secs(3600),
    );
    let pipeline = MediaIngestPipeline::new(
        IdentityResolver::new(vec![Arc::new(FixedIdentity(Some("user-8")))]),
        uploader,
        VIDEO_CEILING,
    );

    let err = pipeline
        .ingest_video(MediaPayload::new(
            vec![0u8; VIDEO_CEILING as usize + 1],
            MediaKind::Video,
            "video/mp4",
            None,
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        err.media_kind(),
        Some(MediaErrorKind::InvalidDescriptor(_))
    ));
}

#[tokio::test]
async fn distinct_uploads_of_same_name_get_distinct_keys() {
    let store = Arc::new(FakeStore::default());
    let pipeline = pipeline_with(Some("user-9"), Arc::clone(&store), Some("media"));

    for _ in 0..2 {
        pipeline
            .ingest_document(document(1024))
            .await
            .unwrap();
        // Millisecond timestamps disambiguate same-named uploads.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let keys = store.keys();
    assert_eq!(keys.len(), 2);
    assert!(keys.iter().all(|k| k.starts_with("user-9/documents/")));
}
