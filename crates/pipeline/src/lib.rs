//! Speech pipeline
//!
//! - `sarvam`: HTTP client for the vendor's speech-to-text, translate and
//!   text-to-speech endpoints
//! - `orchestrator`: speech-to-speech flow chaining the three calls

pub mod orchestrator;
pub mod sarvam;

pub use orchestrator::{PipelineResult, SpeechToSpeechPipeline};
pub use sarvam::{SarvamClient, SarvamConfig};
