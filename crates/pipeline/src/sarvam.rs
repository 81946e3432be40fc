//! Sarvam AI client
//!
//! Wraps the vendor's `speech-to-text`, `translate` and `text-to-speech`
//! endpoints. Every call checks that a subscription key is configured,
//! makes exactly one request, and normalizes the response into the core
//! result records. Failures map onto the core error taxonomy:
//! - no key: `Error::Configuration`
//! - transport failure or non-success status: `Error::Upstream` with the vendor text
//! - success body that breaks the contract: `Error::MalformedResponse`

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Serialize;

use audiogen_config::VendorConfig;
use audiogen_core::{
    AudioUpload, Error, Result, SpeechToText, SynthesisResult, TextToSpeech, TranscriptResult,
    TranslationResult, Translator,
};

const SUBSCRIPTION_KEY_HEADER: &str = "api-subscription-key";

/// Language hint sent with uploads so the vendor detects the language itself
const STT_LANGUAGE_HINT: &str = "unknown";

/// Source language sent with translations so the vendor detects it
const TRANSLATE_SOURCE_AUTO: &str = "auto";

/// Sarvam client configuration
#[derive(Debug, Clone)]
pub struct SarvamConfig {
    /// Subscription key; calls fail with a configuration error when absent
    pub api_key: Option<String>,
    /// API root (for testing or proxy)
    pub base_url: String,
    pub stt_model: String,
    pub tts_model: String,
    pub timeout: Duration,
}

impl Default for SarvamConfig {
    fn default() -> Self {
        Self::from(&VendorConfig::default())
    }
}

impl From<&VendorConfig> for SarvamConfig {
    fn from(config: &VendorConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            stt_model: config.stt_model.clone(),
            tts_model: config.tts_model.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

impl SarvamConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    target_language_code: &'a str,
    model: &'a str,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    input: &'a str,
    source_language_code: &'a str,
    target_language_code: &'a str,
}

/// HTTP client for the Sarvam speech API
pub struct SarvamClient {
    config: SarvamConfig,
    client: Client,
}

impl SarvamClient {
    pub fn new(config: SarvamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        if config.api_key.as_deref().map_or(true, str::is_empty) {
            tracing::warn!("Vendor API key is not configured; speech calls will fail");
        }

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SarvamConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str> {
        match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(Error::configuration("Vendor API key is not configured")),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    /// Upload audio for transcription with language detection
    pub async fn speech_to_text(&self, audio: &AudioUpload) -> Result<TranscriptResult> {
        let api_key = self.api_key()?;
        let start = Instant::now();

        let file = Part::bytes(audio.bytes.clone())
            .file_name(audio.filename.clone())
            .mime_str(&audio.content_type)
            .map_err(|e| {
                Error::validation(format!(
                    "Invalid audio content type '{}': {}",
                    audio.content_type, e
                ))
            })?;

        let form = Form::new()
            .part("file", file)
            .text("model", self.config.stt_model.clone())
            .text("language_code", STT_LANGUAGE_HINT);

        let response = self
            .client
            .post(self.endpoint("speech-to-text"))
            .header(SUBSCRIPTION_KEY_HEADER, api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::upstream(format!("Speech-to-text request failed: {}", e)))?;

        let response = ensure_success(response, "Speech-to-text").await?;
        let result: TranscriptResult = response.json().await.map_err(|e| {
            Error::malformed(format!("Invalid speech-to-text response: {}", e))
        })?;

        tracing::info!(
            filename = %audio.filename,
            bytes = audio.bytes.len(),
            language = ?result.language_code,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Speech-to-text completed"
        );

        Ok(result)
    }

    /// Synthesize speech; `model` defaults to the configured TTS model
    pub async fn text_to_speech(
        &self,
        text: &str,
        target_language_code: &str,
        model: Option<&str>,
    ) -> Result<SynthesisResult> {
        let api_key = self.api_key()?;
        let start = Instant::now();

        let request = TtsRequest {
            text,
            target_language_code,
            model: model.unwrap_or(self.config.tts_model.as_str()),
        };

        let response = self
            .client
            .post(self.endpoint("text-to-speech"))
            .header(SUBSCRIPTION_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::upstream(format!("Text-to-speech request failed: {}", e)))?;

        let response = ensure_success(response, "Text-to-speech").await?;
        let result: SynthesisResult = response.json().await.map_err(|e| {
            Error::malformed(format!("Invalid text-to-speech response: {}", e))
        })?;

        tracing::info!(
            target_language = target_language_code,
            model = request.model,
            clips = result.audios.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Text-to-speech completed"
        );

        Ok(result)
    }

    /// Translate text into `target_language_code`, auto-detecting the source
    pub async fn translate_text(
        &self,
        text: &str,
        target_language_code: &str,
    ) -> Result<TranslationResult> {
        let api_key = self.api_key()?;
        let start = Instant::now();

        let request = TranslateRequest {
            input: text,
            source_language_code: TRANSLATE_SOURCE_AUTO,
            target_language_code,
        };

        let response = self
            .client
            .post(self.endpoint("translate"))
            .header(SUBSCRIPTION_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::upstream(format!("Translation request failed: {}", e)))?;

        let response = ensure_success(response, "Translation").await?;
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::malformed(format!("Invalid translation response: {}", e)))?;

        let result = normalize_translation(&body, text, target_language_code)?;

        tracing::info!(
            source_language = %result.source_language,
            target_language = %result.target_language,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Translation completed"
        );

        Ok(result)
    }
}

/// Turn a non-success response into `Error::Upstream` carrying the vendor text
async fn ensure_success(response: Response, operation: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = %status, operation, "Vendor returned an error");
    Err(Error::upstream(format!("{} failed: {}", operation, body)))
}

/// Map the vendor translate body onto `TranslationResult`
///
/// `translated_text` is required; the language codes fall back to `"auto"`
/// and the requested target.
fn normalize_translation(
    body: &serde_json::Value,
    original_text: &str,
    target_language_code: &str,
) -> Result<TranslationResult> {
    let translation = body
        .get("translated_text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::malformed("Invalid translation response - missing translated_text"))?;

    let source_language = body
        .get("source_language_code")
        .and_then(|v| v.as_str())
        .unwrap_or(TRANSLATE_SOURCE_AUTO);
    let target_language = body
        .get("target_language_code")
        .and_then(|v| v.as_str())
        .unwrap_or(target_language_code);

    Ok(TranslationResult {
        original_text: original_text.to_string(),
        translation: translation.to_string(),
        source_language: source_language.to_string(),
        target_language: target_language.to_string(),
    })
}

#[async_trait]
impl SpeechToText for SarvamClient {
    async fn transcribe(&self, audio: &AudioUpload) -> Result<TranscriptResult> {
        self.speech_to_text(audio).await
    }
}

#[async_trait]
impl Translator for SarvamClient {
    async fn translate(&self, text: &str, target_language_code: &str) -> Result<TranslationResult> {
        self.translate_text(text, target_language_code).await
    }
}

#[async_trait]
impl TextToSpeech for SarvamClient {
    async fn synthesize(
        &self,
        text: &str,
        target_language_code: &str,
        model: Option<&str>,
    ) -> Result<SynthesisResult> {
        self.text_to_speech(text, target_language_code, model).await
    }
}
