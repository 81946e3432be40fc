//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use audiogen_config::Settings;
use audiogen_core::{SpeechToText, TextToSpeech, Translator};
use audiogen_persistence::FeedbackStore;
use audiogen_pipeline::{SarvamClient, SpeechToSpeechPipeline};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub stt: Arc<dyn SpeechToText>,
    pub translator: Arc<dyn Translator>,
    pub tts: Arc<dyn TextToSpeech>,
    pub pipeline: SpeechToSpeechPipeline,
    pub feedback: Arc<dyn FeedbackStore>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        stt: Arc<dyn SpeechToText>,
        translator: Arc<dyn Translator>,
        tts: Arc<dyn TextToSpeech>,
        feedback: Arc<dyn FeedbackStore>,
    ) -> Self {
        let pipeline = SpeechToSpeechPipeline::new(stt.clone(), translator.clone(), tts.clone());
        Self {
            settings: Arc::new(settings),
            stt,
            translator,
            tts,
            pipeline,
            feedback,
        }
    }

    /// One vendor client serves all three speech services
    pub fn with_vendor(
        settings: Settings,
        vendor: Arc<SarvamClient>,
        feedback: Arc<dyn FeedbackStore>,
    ) -> Self {
        Self::new(settings, vendor.clone(), vendor.clone(), vendor, feedback)
    }

    /// Configured admin key, if any
    pub fn admin_api_key(&self) -> Option<&str> {
        self.settings
            .auth
            .admin_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }
}
