//! HTTP surface tests
//!
//! Drive the router directly with `oneshot`; the vendor is a fake and the
//! feedback store is in memory.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use audiogen_config::Settings;
use audiogen_core::{
    AudioUpload, Error, FeedbackRecord, Result, SpeechToText, StoredFeedback, SynthesisResult,
    TextToSpeech, TranscriptResult, TranslationResult, Translator,
};
use audiogen_persistence::{FeedbackStore, InMemoryFeedbackStore, PersistenceError};
use audiogen_server::{create_router, AppState};

const ADMIN_KEY: &str = "admin-secret";
const BOUNDARY: &str = "audiogen-test-boundary";

#[derive(Default)]
struct FakeVendor {
    detected_language: Option<&'static str>,
    fail_stt: bool,
    malformed_translation: bool,
    translate_targets: Mutex<Vec<String>>,
    tts_targets: Mutex<Vec<String>>,
}

#[async_trait]
impl SpeechToText for FakeVendor {
    async fn transcribe(&self, audio: &AudioUpload) -> Result<TranscriptResult> {
        if self.fail_stt {
            return Err(Error::upstream("Speech-to-text failed: unsupported audio"));
        }
        Ok(TranscriptResult::new(
            format!("heard {} bytes", audio.bytes.len()),
            self.detected_language,
        ))
    }
}

#[async_trait]
impl Translator for FakeVendor {
    async fn translate(&self, text: &str, target: &str) -> Result<TranslationResult> {
        self.translate_targets.lock().unwrap().push(target.to_string());
        if self.malformed_translation {
            return Err(Error::malformed(
                "Invalid translation response - missing translated_text",
            ));
        }
        Ok(TranslationResult {
            original_text: text.to_string(),
            translation: format!("{} ({})", text, target),
            source_language: self.detected_language.unwrap_or("auto").to_string(),
            target_language: target.to_string(),
        })
    }
}

#[async_trait]
impl TextToSpeech for FakeVendor {
    async fn synthesize(
        &self,
        _text: &str,
        target: &str,
        _model: Option<&str>,
    ) -> Result<SynthesisResult> {
        self.tts_targets.lock().unwrap().push(target.to_string());
        Ok(SynthesisResult::new(vec!["UklGRg==".to_string()]))
    }
}

/// Store whose every call fails, as if the cluster went away
struct BrokenStore;

#[async_trait]
impl FeedbackStore for BrokenStore {
    async fn insert(
        &self,
        _record: FeedbackRecord,
    ) -> std::result::Result<StoredFeedback, PersistenceError> {
        Err(PersistenceError::InvalidData("write timeout".into()))
    }

    async fn list(&self) -> std::result::Result<Vec<StoredFeedback>, PersistenceError> {
        Err(PersistenceError::InvalidData("read timeout at 10.0.0.7".into()))
    }

    async fn ping(&self) -> std::result::Result<(), PersistenceError> {
        Err(PersistenceError::InvalidData("unreachable".into()))
    }
}

fn settings(admin_key: Option<&str>) -> Settings {
    let mut settings = Settings::default();
    settings.persistence.enabled = false;
    settings.auth.admin_api_key = admin_key.map(str::to_string);
    settings
}

fn app_with(
    vendor: Arc<FakeVendor>,
    store: Arc<dyn FeedbackStore>,
    admin_key: Option<&str>,
) -> Router {
    let state = AppState::new(
        settings(admin_key),
        vendor.clone(),
        vendor.clone(),
        vendor,
        store,
    );
    create_router(state)
}

fn app(vendor: FakeVendor) -> Router {
    app_with(
        Arc::new(vendor),
        Arc::new(InMemoryFeedbackStore::new()),
        Some(ADMIN_KEY),
    )
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_multipart(uri: &str, field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: audio/wav\r\n\r\n",
        b = BOUNDARY,
        field = field,
        filename = filename,
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn list_request(uri: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_root_and_health() {
    let app = app(FakeVendor::default());

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Hello, this is the API for OdiaAudioGen!"));

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["store"]["status"], "ok");
}

#[tokio::test]
async fn test_cors_default_and_restricted() {
    let with_origin = |origin: &str| {
        Request::builder()
            .uri("/")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    };

    let open = app(FakeVendor::default());
    let response = open
        .clone()
        .oneshot(with_origin("https://anywhere.example"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let mut restricted = settings(None);
    restricted.server.cors_enabled = true;
    restricted.server.cors_origins = vec!["https://odia.example".to_string()];
    let vendor = Arc::new(FakeVendor::default());
    let restricted = create_router(AppState::new(
        restricted,
        vendor.clone(),
        vendor.clone(),
        vendor,
        Arc::new(InMemoryFeedbackStore::new()),
    ));

    let response = restricted
        .clone()
        .oneshot(with_origin("https://odia.example"))
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://odia.example"
    );

    let response = restricted
        .oneshot(with_origin("https://anywhere.example"))
        .await
        .unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_health_reports_broken_store() {
    let app = app_with(
        Arc::new(FakeVendor::default()),
        Arc::new(BrokenStore),
        Some(ADMIN_KEY),
    );

    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["checks"]["store"]["status"], "unavailable");
}

#[tokio::test]
async fn test_info_endpoints() {
    let app = app(FakeVendor::default());

    let (status, body) = send(&app, get("/api/v1/tts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "This is the NEW text-to-speech endpoint");
    assert_eq!(body["data"]["target_language_code"], "en-US");

    for (uri, kind) in [
        ("/api/v1/stt", "Speech to Text"),
        ("/api/v1/sts", "Speech to Speech"),
        ("/api/v1/ttt", "Text to Text"),
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert!(body["message"].as_str().unwrap().contains(kind));
    }
}

#[tokio::test]
async fn test_text_to_speech() {
    let vendor = Arc::new(FakeVendor::default());
    let app = app_with(vendor.clone(), Arc::new(InMemoryFeedbackStore::new()), None);

    let (status, body) = send(
        &app,
        post_json("/api/v1/tts", json!({ "text": "hello", "target_language_code": "od-IN" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["audios"], json!(["UklGRg=="]));
    assert_eq!(*vendor.tts_targets.lock().unwrap(), vec!["od-IN".to_string()]);
}

#[tokio::test]
async fn test_text_to_speech_rejects_incomplete_body() {
    let app = app(FakeVendor::default());

    let (status, body) = send(&app, post_json("/api/v1/tts", json!({ "text": "hello" }))).await;

    assert!(status.is_client_error());
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_speech_to_text() {
    let app = app(FakeVendor {
        detected_language: Some("od-IN"),
        ..Default::default()
    });

    let (status, body) =
        send(&app, post_multipart("/api/v1/stt", "audio", "clip.wav", b"RIFFDATA")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transcript"], "heard 8 bytes");
    assert_eq!(body["language_code"], "od-IN");
}

#[tokio::test]
async fn test_speech_to_text_missing_audio() {
    let app = app(FakeVendor::default());

    let (status, body) =
        send(&app, post_multipart("/api/v1/stt", "file", "clip.wav", b"RIFFDATA")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Missing audio file in request.");
}

#[tokio::test]
async fn test_speech_to_speech_response_shape() {
    let vendor = Arc::new(FakeVendor {
        detected_language: Some("en-IN"),
        ..Default::default()
    });
    let app = app_with(vendor.clone(), Arc::new(InMemoryFeedbackStore::new()), None);

    let (status, body) =
        send(&app, post_multipart("/api/v1/sts", "audio", "greeting.wav", b"RIFF")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Speech to Speech conversion successful");
    assert_eq!(body["originalAudio"], "greeting.wav");
    assert_eq!(body["transcript"], "heard 4 bytes");
    assert_eq!(body["translation"], "heard 4 bytes (od-IN)");
    assert_eq!(body["audio"], "UklGRg==");
    assert_eq!(body["pipeline"]["sourceLanguage"], "en-IN");
    assert_eq!(body["pipeline"]["targetLanguage"], "od-IN");
    assert_eq!(*vendor.translate_targets.lock().unwrap(), vec!["od-IN".to_string()]);
    assert_eq!(*vendor.tts_targets.lock().unwrap(), vec!["od-IN".to_string()]);
}

#[tokio::test]
async fn test_trailing_slash_routes() {
    let vendor = Arc::new(FakeVendor {
        detected_language: Some("od-IN"),
        ..Default::default()
    });
    let app = app_with(vendor.clone(), Arc::new(InMemoryFeedbackStore::new()), None);

    for uri in ["/api/v1/tts/", "/api/v1/stt/", "/api/v1/sts/", "/api/v1/ttt/"] {
        let (status, _) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "GET {}", uri);
    }

    let (status, body) =
        send(&app, post_multipart("/api/v1/sts/", "audio", "clip.wav", b"RIFF")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pipeline"]["targetLanguage"], "en-IN");
    assert_eq!(body["audio"], "UklGRg==");

    let (status, body) = send(&app, post_json("/api/v1/ttt/", json!({ "text": "hello" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translation"], "hello (en-IN)");
}

#[tokio::test]
async fn test_speech_to_speech_upstream_failure() {
    let vendor = Arc::new(FakeVendor {
        fail_stt: true,
        ..Default::default()
    });
    let app = app_with(vendor.clone(), Arc::new(InMemoryFeedbackStore::new()), None);

    let (status, body) =
        send(&app, post_multipart("/api/v1/sts", "audio", "clip.wav", b"RIFF")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Speech-to-text failed: unsupported audio");
    assert!(vendor.translate_targets.lock().unwrap().is_empty());
    assert!(vendor.tts_targets.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_text_to_text() {
    let vendor = Arc::new(FakeVendor::default());
    let app = app_with(vendor.clone(), Arc::new(InMemoryFeedbackStore::new()), None);

    let (status, body) = send(&app, post_json("/api/v1/ttt", json!({ "text": "namaskar" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["originalText"], "namaskar");
    assert_eq!(body["translation"], "namaskar (en-IN)");
    assert_eq!(body["targetLanguage"], "en-IN");
    assert_eq!(*vendor.translate_targets.lock().unwrap(), vec!["en-IN".to_string()]);

    let (status, body) = send(
        &app,
        post_json("/api/v1/ttt", json!({ "text": "hello", "targetLanguage": "od-IN" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["targetLanguage"], "od-IN");
}

#[tokio::test]
async fn test_text_to_text_requires_text() {
    let vendor = Arc::new(FakeVendor::default());
    let app = app_with(vendor.clone(), Arc::new(InMemoryFeedbackStore::new()), None);

    for body in [json!({ "text": "" }), json!({ "targetLanguage": "od-IN" })] {
        let (status, body) = send(&app, post_json("/api/v1/ttt", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Text to translate is required");
    }
    assert!(vendor.translate_targets.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_text_to_text_malformed_vendor_response() {
    let app = app(FakeVendor {
        malformed_translation: true,
        ..Default::default()
    });

    let (status, body) = send(&app, post_json("/api/v1/ttt", json!({ "text": "hello" }))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "Invalid translation response - missing translated_text"
    );
}

#[tokio::test]
async fn test_feedback_submit_and_list() {
    let app = app(FakeVendor::default());

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/feedback/submit",
            json!({ "rating": 5, "message": "Very natural voice" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Feedback submitted successfully");
    assert_eq!(body["data"]["name"], "Anonymous");
    assert_eq!(body["data"]["email"], "No email provided");
    assert_eq!(body["data"]["rating"], 5);
    let id = body["data"]["_id"].as_str().unwrap().to_string();

    for uri in ["/api/v1/feedback", "/api/v1/feedback/"] {
        let (status, body) = send(&app, list_request(uri, Some(ADMIN_KEY))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["_id"], id.as_str());
        assert_eq!(body["data"][0]["message"], "Very natural voice");
    }
}

#[tokio::test]
async fn test_feedback_submit_validation() {
    let app = app(FakeVendor::default());

    for payload in [
        json!({ "rating": 4 }),
        json!({ "message": "no rating" }),
        json!({ "rating": 3, "message": "" }),
    ] {
        let (status, body) = send(&app, post_json("/api/v1/feedback/submit", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Rating and message are required");
    }

    let (status, _) = send(
        &app,
        post_json("/api/v1/feedback/submit", json!({ "rating": 6, "message": "too much" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, list_request("/api/v1/feedback/", Some(ADMIN_KEY))).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_feedback_submit_lenient_fields() {
    let app = app(FakeVendor::default());

    for payload in [
        json!({ "rating": 4.0, "message": "float rating" }),
        json!({ "rating": "4", "message": "string rating" }),
        json!({ "rating": 3, "message": "  " }),
    ] {
        let (status, body) = send(&app, post_json("/api/v1/feedback/submit", payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    let (status, _) = send(
        &app,
        post_json("/api/v1/feedback/submit", json!({ "rating": 4.5, "message": "half" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, list_request("/api/v1/feedback/", Some(ADMIN_KEY))).await;
    let ratings: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["rating"].as_i64().unwrap())
        .collect();
    assert_eq!(ratings.len(), 3);
    assert!(ratings.contains(&4));
}

#[tokio::test]
async fn test_feedback_list_auth() {
    let app = app(FakeVendor::default());

    let (status, body) = send(&app, list_request("/api/v1/feedback/", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "API key missing");

    let (status, body) = send(&app, list_request("/api/v1/feedback/", Some(""))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "API key missing");

    let (status, body) = send(&app, list_request("/api/v1/feedback/", Some("guess"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Invalid API key");
}

#[tokio::test]
async fn test_feedback_list_without_configured_key() {
    let app = app_with(
        Arc::new(FakeVendor::default()),
        Arc::new(InMemoryFeedbackStore::new()),
        None,
    );

    let (status, _) = send(&app, list_request("/api/v1/feedback/", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, list_request("/api/v1/feedback/", Some(""))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "API key missing");

    let (status, body) = send(&app, list_request("/api/v1/feedback/", Some("anything"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Invalid API key");
}

#[tokio::test]
async fn test_feedback_store_failure_is_hidden() {
    let app = app_with(
        Arc::new(FakeVendor::default()),
        Arc::new(BrokenStore),
        Some(ADMIN_KEY),
    );

    let (status, body) = send(&app, list_request("/api/v1/feedback/", Some(ADMIN_KEY))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Internal server error");

    let (status, body) = send(
        &app,
        post_json("/api/v1/feedback/submit", json!({ "rating": 2, "message": "meh" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Internal server error");
}
