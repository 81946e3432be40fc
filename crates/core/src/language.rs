//! Languages supported by the speech-to-speech pipeline
//!
//! The pipeline toggles between exactly two languages. A detected language
//! equal to the primary one is translated into the secondary one; anything
//! else (including an undetected language) is translated into the primary.

use serde::{Deserialize, Serialize};

/// The two languages the speech-to-speech toggle operates between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PipelineLanguage {
    #[default]
    English,
    Odia,
}

impl PipelineLanguage {
    pub const PRIMARY: Self = Self::English;
    pub const SECONDARY: Self = Self::Odia;

    /// Vendor language code (BCP-47 style, as the vendor spells it)
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en-IN",
            Self::Odia => "od-IN",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Odia => "Odia",
        }
    }

    /// Parse a vendor code. Only the two pipeline codes are recognised.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en-IN" => Some(Self::English),
            "od-IN" => Some(Self::Odia),
            _ => None,
        }
    }

    /// The other language of the pair
    pub fn counterpart(&self) -> Self {
        match self {
            Self::English => Self::Odia,
            Self::Odia => Self::English,
        }
    }

    /// Pick the translation target for a detected source language code
    pub fn target_for(detected: Option<&str>) -> Self {
        if detected == Some(Self::PRIMARY.code()) {
            Self::SECONDARY
        } else {
            Self::PRIMARY
        }
    }
}

impl std::fmt::Display for PipelineLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
