//! Error types shared across the gateway
//!
//! Each variant corresponds to one failure kind the HTTP layer maps to a
//! status code. Callers match on the variant, never on the message.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Admin key failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("API key missing")]
    Missing,

    #[error("Invalid API key")]
    Invalid,
}

#[derive(Error, Debug)]
pub enum Error {
    /// A required credential or setting is absent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The vendor answered with a non-success status, or could not be reached
    #[error("{0}")]
    Upstream(String),

    /// The vendor answered successfully but the body broke its contract
    #[error("{0}")]
    MalformedResponse(String),

    /// Caller input failed a required-field or range check
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Store failure. The message is for logs only.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short, stable name of the failure kind (used in logs)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Upstream(_) => "upstream",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Validation(_) => "validation",
            Self::Auth(_) => "auth",
            Self::Internal(_) => "internal",
        }
    }
}
