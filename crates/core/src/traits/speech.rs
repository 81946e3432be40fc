//! Speech processing traits

use crate::transcript::{SynthesisResult, TranscriptResult, TranslationResult};
use crate::Result;
use async_trait::async_trait;

/// An uploaded audio file as received from the browser
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

impl AudioUpload {
    pub fn new(
        bytes: Vec<u8>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }
}

/// Speech-to-Text interface
///
/// # Example
///
/// ```ignore
/// let stt: Arc<dyn SpeechToText> = Arc::new(SarvamClient::new(config)?);
/// let transcript = stt.transcribe(&upload).await?;
/// println!("{} ({:?})", transcript.transcript, transcript.language_code);
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync + 'static {
    /// Transcribe an uploaded audio file, detecting its language
    async fn transcribe(&self, audio: &AudioUpload) -> Result<TranscriptResult>;
}

/// Text-to-text translation interface
#[async_trait]
pub trait Translator: Send + Sync + 'static {
    /// Translate `text` into `target_language_code`; the source is auto-detected
    async fn translate(&self, text: &str, target_language_code: &str) -> Result<TranslationResult>;
}

/// Text-to-Speech interface
#[async_trait]
pub trait TextToSpeech: Send + Sync + 'static {
    /// Synthesize `text` spoken in `target_language_code`
    ///
    /// `model` overrides the configured synthesis model when given.
    async fn synthesize(
        &self,
        text: &str,
        target_language_code: &str,
        model: Option<&str>,
    ) -> Result<SynthesisResult>;
}
