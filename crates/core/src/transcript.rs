//! Result records produced by the speech vendor calls

use serde::{Deserialize, Serialize};

/// Speech-to-text output
///
/// Vendor fields beyond `transcript` and `language_code` are kept in `extra`
/// so the record can be handed back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub transcript: String,
    /// Detected source language; the vendor reports null when unsure
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TranscriptResult {
    pub fn new(transcript: impl Into<String>, language_code: Option<&str>) -> Self {
        Self {
            transcript: transcript.into(),
            language_code: language_code.map(str::to_string),
            extra: serde_json::Map::new(),
        }
    }
}

/// Text-to-text translation output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub original_text: String,
    pub translation: String,
    pub source_language: String,
    pub target_language: String,
}

/// Text-to-speech output: base64 encoded clips in vendor order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SynthesisResult {
    #[serde(default)]
    pub audios: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SynthesisResult {
    pub fn new(audios: Vec<String>) -> Self {
        Self {
            audios,
            extra: serde_json::Map::new(),
        }
    }

    /// First clip, if the vendor produced any
    pub fn first_audio(&self) -> Option<&str> {
        self.audios.first().map(String::as_str)
    }
}
