//! Core traits and types for the speech gateway
//!
//! This crate provides the types shared by every other crate:
//! - Result records returned by the speech vendor (transcript, translation, synthesis)
//! - The two-language toggle used by the speech-to-speech pipeline
//! - Service traits that the vendor client implements and the pipeline consumes
//! - Feedback records and their acceptance rules
//! - Error taxonomy

pub mod error;
pub mod feedback;
pub mod language;
pub mod traits;
pub mod transcript;

pub use error::{AuthError, Error, Result};
pub use feedback::{FeedbackRecord, FeedbackSubmission, StoredFeedback};
pub use language::PipelineLanguage;
pub use traits::{AudioUpload, SpeechToText, TextToSpeech, Translator};
pub use transcript::{SynthesisResult, TranscriptResult, TranslationResult};
