//! HTTP Endpoints
//!
//! REST API for the speech gateway. Every inference route answers `GET` with
//! a short usage note and does the work on `POST`.

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, Multipart,
        State,
    },
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use audiogen_core::{
    AudioUpload, Error, FeedbackSubmission, PipelineLanguage, StoredFeedback, SynthesisResult,
    TranscriptResult, TranslationResult,
};
use audiogen_persistence::submit_feedback;

use crate::auth::{AdminKey, API_KEY_HEADER};
use crate::state::AppState;
use crate::ServerError;

const ROOT_MESSAGE: &str = "Hello, this is the API for OdiaAudioGen!";
const AUDIO_FIELD: &str = "audio";
const MISSING_AUDIO: &str = "Missing audio file in request.";
const MISSING_TEXT: &str = "Text to translate is required";
const DEFAULT_FILENAME: &str = "audio";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
const DEV_ORIGIN: &str = "http://localhost:3000";

type ApiResult<T> = Result<Json<T>, ServerError>;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.settings.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);
    let body_limit = DefaultBodyLimit::max(server.max_upload_bytes);

    let api = Router::new()
        .route("/tts", get(tts_info).post(text_to_speech))
        .route("/tts/", get(tts_info).post(text_to_speech))
        .route("/stt", get(stt_info).post(speech_to_text))
        .route("/stt/", get(stt_info).post(speech_to_text))
        .route("/sts", get(sts_info).post(speech_to_speech))
        .route("/sts/", get(sts_info).post(speech_to_speech))
        .route("/ttt", get(ttt_info).post(text_to_text))
        .route("/ttt/", get(ttt_info).post(text_to_text))
        .route("/feedback/submit", post(submit))
        .route("/feedback", get(list_feedback))
        .route("/feedback/", get(list_feedback));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer
/// - If cors_origins is empty or all invalid, allows only the local dev origin
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::info!("CORS origin checks off, allowing all origins");
        return CorsLayer::permissive();
    }

    let mut parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No usable CORS origins configured, defaulting to {}", DEV_ORIGIN);
        parsed_origins.push(HeaderValue::from_static(DEV_ORIGIN));
    } else {
        tracing::info!("CORS configured with {} origins", parsed_origins.len());
    }

    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(API_KEY_HEADER)])
}

async fn root() -> Json<&'static str> {
    Json(ROOT_MESSAGE)
}

/// Health check
///
/// Reports the store reachability; 503 when the ping fails.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, store) = match state.feedback.ping().await {
        Ok(()) => (StatusCode::OK, json!({ "status": "ok" })),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, json!({ "status": "unavailable" }))
        }
    };

    let body = json!({
        "status": if status == StatusCode::OK { "healthy" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "checks": { "store": store },
    });
    (status, Json(body))
}

fn usage(message: &str) -> Json<Value> {
    Json(json!({ "message": message, "status": "success" }))
}

// ---------------------------------------------------------------------------
// Text-to-speech

#[derive(Debug, Deserialize)]
struct TtsRequest {
    text: String,
    target_language_code: String,
}

async fn tts_info() -> Json<Value> {
    Json(json!({
        "message": "This is the NEW text-to-speech endpoint",
        "data": {
            "text": "Hello, this is a sample text for TTS.",
            "target_language_code": "en-US",
        },
    }))
}

async fn text_to_speech(
    State(state): State<AppState>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> ApiResult<SynthesisResult> {
    let Json(request) = payload?;
    let result = state
        .tts
        .synthesize(&request.text, &request.target_language_code, None)
        .await?;
    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// Speech-to-text

async fn stt_info() -> Json<Value> {
    usage("This is the Speech to Text API endpoint. Please use POST method with audio data.")
}

async fn speech_to_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<TranscriptResult> {
    let audio = read_audio(multipart?).await?;
    let result = state.stt.transcribe(&audio).await?;
    Ok(Json(result))
}

/// Pull the `audio` file part out of a multipart body
async fn read_audio(mut multipart: Multipart) -> Result<AudioUpload, ServerError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or(DEFAULT_FILENAME).to_string();
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let bytes = field.bytes().await?;

        tracing::debug!(filename = %filename, bytes = bytes.len(), "Received audio upload");
        return Ok(AudioUpload::new(bytes.to_vec(), filename, content_type));
    }

    Err(Error::validation(MISSING_AUDIO).into())
}

// ---------------------------------------------------------------------------
// Speech-to-speech

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PipelineLanguages {
    source_language: String,
    target_language: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StsResponse {
    message: &'static str,
    original_audio: String,
    transcript: String,
    translation: String,
    audio: Option<String>,
    pipeline: PipelineLanguages,
}

async fn sts_info() -> Json<Value> {
    usage("This is the Speech to Speech API endpoint. Please use POST method with audio data.")
}

async fn speech_to_speech(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<StsResponse> {
    let audio = read_audio(multipart?).await?;
    let result = state.pipeline.speech_to_speech(&audio).await?;

    Ok(Json(StsResponse {
        message: "Speech to Speech conversion successful",
        original_audio: audio.filename,
        transcript: result.transcript,
        translation: result.translation,
        audio: result.audio,
        pipeline: PipelineLanguages {
            source_language: result.source_language,
            target_language: result.target_language,
        },
    }))
}

// ---------------------------------------------------------------------------
// Text-to-text

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TttRequest {
    #[serde(default)]
    text: Option<String>,
    #[serde(default = "default_target_language")]
    target_language: String,
}

fn default_target_language() -> String {
    PipelineLanguage::PRIMARY.code().to_string()
}

#[derive(Debug, Serialize)]
struct TttResponse {
    success: bool,
    #[serde(flatten)]
    result: TranslationResult,
}

async fn ttt_info() -> Json<Value> {
    usage("This is the Text to Text API endpoint. Please use POST method with text data.")
}

async fn text_to_text(
    State(state): State<AppState>,
    payload: Result<Json<TttRequest>, JsonRejection>,
) -> ApiResult<TttResponse> {
    let Json(request) = payload?;
    let text = request
        .text
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::validation(MISSING_TEXT))?;

    let result = state
        .translator
        .translate(&text, &request.target_language)
        .await?;
    Ok(Json(TttResponse {
        success: true,
        result,
    }))
}

// ---------------------------------------------------------------------------
// Feedback

#[derive(Debug, Serialize)]
struct SubmitResponse {
    success: bool,
    message: &'static str,
    data: StoredFeedback,
}

#[derive(Debug, Serialize)]
struct ListResponse {
    success: bool,
    data: Vec<StoredFeedback>,
}

async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackSubmission>, JsonRejection>,
) -> ApiResult<SubmitResponse> {
    let Json(submission) = payload?;
    let stored = submit_feedback(state.feedback.as_ref(), submission).await?;

    Ok(Json(SubmitResponse {
        success: true,
        message: "Feedback submitted successfully",
        data: stored,
    }))
}

async fn list_feedback(
    _admin: AdminKey,
    State(state): State<AppState>,
) -> ApiResult<ListResponse> {
    let data = state.feedback.list().await?;
    Ok(Json(ListResponse {
        success: true,
        data,
    }))
}
