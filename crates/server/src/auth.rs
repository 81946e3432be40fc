//! Admin key check for the feedback listing
//!
//! The key travels in the `x-api-key` header and is compared against
//! `auth.admin_api_key`. With no key configured every supplied key is
//! rejected.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use audiogen_core::AuthError;

use crate::state::AppState;
use crate::ServerError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the request carried the admin key
#[derive(Debug, Clone, Copy)]
pub struct AdminKey;

#[async_trait]
impl FromRequestParts<AppState> for AdminKey {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = presented_key(&parts.headers).ok_or(AuthError::Missing)?;

        check_key(provided, state.admin_api_key())?;
        Ok(AdminKey)
    }
}

/// The `x-api-key` value, with an empty header counting as absent
fn presented_key(headers: &HeaderMap) -> Option<&[u8]> {
    headers
        .get(API_KEY_HEADER)
        .map(|value| value.as_bytes())
        .filter(|value| !value.is_empty())
}

fn check_key(provided: &[u8], expected: Option<&str>) -> Result<(), AuthError> {
    let Some(expected) = expected else {
        tracing::warn!("Admin key presented but none is configured");
        return Err(AuthError::Invalid);
    };

    if constant_time_compare(provided, expected.as_bytes()) {
        Ok(())
    } else {
        tracing::warn!("Invalid admin key provided");
        Err(AuthError::Invalid)
    }
}

/// Constant-time comparison to prevent timing attacks
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
