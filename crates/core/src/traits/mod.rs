//! Service traits
//!
//! The vendor client implements these; the pipeline and the HTTP layer only
//! ever hold `Arc<dyn ...>` handles so tests can swap in fakes.

mod speech;

pub use speech::{AudioUpload, SpeechToText, TextToSpeech, Translator};
