//! Speech gateway server
//!
//! HTTP endpoints for speech-to-text, text-to-speech, translation,
//! speech-to-speech and feedback collection.

pub mod auth;
pub mod http;
pub mod state;

pub use auth::AdminKey;
pub use http::create_router;
pub use state::AppState;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use audiogen_core::{AuthError, Error};
use audiogen_persistence::PersistenceError;

/// Detail returned in place of internal error messages
pub const INTERNAL_DETAIL: &str = "Internal server error";

/// Server errors
///
/// Rendered as `{"detail": "<message>"}`.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Core(#[from] Error),

    /// The request body could not be extracted
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Core(err) => match err {
                Error::Validation(_) => StatusCode::BAD_REQUEST,
                Error::Auth(AuthError::Missing) => StatusCode::UNAUTHORIZED,
                Error::Auth(AuthError::Invalid) => StatusCode::FORBIDDEN,
                Error::Configuration(_)
                | Error::Upstream(_)
                | Error::MalformedResponse(_)
                | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Rejected { status, .. } => *status,
        }
    }

    fn detail(&self) -> String {
        match self {
            ServerError::Core(Error::Internal(_)) => INTERNAL_DETAIL.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match &self {
                ServerError::Core(err) => {
                    tracing::error!(kind = err.kind(), error = %err, "Request failed")
                }
                ServerError::Rejected { detail, .. } => {
                    tracing::error!(error = %detail, "Request failed")
                }
            }
        }

        let body = serde_json::json!({ "detail": self.detail() });
        (status, Json(body)).into_response()
    }
}

impl From<PersistenceError> for ServerError {
    fn from(err: PersistenceError) -> Self {
        ServerError::Core(err.into())
    }
}

impl From<AuthError> for ServerError {
    fn from(err: AuthError) -> Self {
        ServerError::Core(err.into())
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::Rejected {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<MultipartRejection> for ServerError {
    fn from(rejection: MultipartRejection) -> Self {
        ServerError::Rejected {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for ServerError {
    fn from(err: MultipartError) -> Self {
        ServerError::Rejected {
            status: err.status(),
            detail: err.body_text(),
        }
    }
}
