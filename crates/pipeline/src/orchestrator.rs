//! Speech-to-speech orchestration
//!
//! Flow:
//! 1. Speech-to-text with language detection
//! 2. Pick the target: primary language → secondary, anything else → primary
//! 3. Translate the transcript into the target
//! 4. Synthesize the translation in the target
//!
//! Each step depends on the previous one, so the calls run strictly in
//! sequence. The first failure aborts the flow and is returned unchanged.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use audiogen_core::{
    AudioUpload, PipelineLanguage, Result, SpeechToText, TextToSpeech, Translator,
};

/// Combined output of one speech-to-speech run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub transcript: String,
    pub translation: String,
    /// First synthesized clip (base64), `None` when the vendor returned none
    pub audio: Option<String>,
    pub source_language: String,
    pub target_language: String,
}

/// Chains speech-to-text, translation and text-to-speech
#[derive(Clone)]
pub struct SpeechToSpeechPipeline {
    stt: Arc<dyn SpeechToText>,
    translator: Arc<dyn Translator>,
    tts: Arc<dyn TextToSpeech>,
}

impl SpeechToSpeechPipeline {
    pub fn new(
        stt: Arc<dyn SpeechToText>,
        translator: Arc<dyn Translator>,
        tts: Arc<dyn TextToSpeech>,
    ) -> Self {
        Self {
            stt,
            translator,
            tts,
        }
    }

    pub async fn speech_to_speech(&self, audio: &AudioUpload) -> Result<PipelineResult> {
        let start = Instant::now();

        let transcript = self.stt.transcribe(audio).await?;
        let target = PipelineLanguage::target_for(transcript.language_code.as_deref());
        tracing::debug!(
            detected = ?transcript.language_code,
            target = %target,
            "Selected translation target"
        );

        let translation = self
            .translator
            .translate(&transcript.transcript, target.code())
            .await?;

        let synthesis = self
            .tts
            .synthesize(&translation.translation, target.code(), None)
            .await?;

        tracing::info!(
            filename = %audio.filename,
            source_language = %translation.source_language,
            target_language = %translation.target_language,
            has_audio = !synthesis.audios.is_empty(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Speech-to-speech completed"
        );

        let audio = synthesis.first_audio().map(str::to_string);
        Ok(PipelineResult {
            transcript: transcript.transcript,
            translation: translation.translation,
            audio,
            source_language: translation.source_language,
            target_language: translation.target_language,
        })
    }
}
