//! Bearer-token session extraction.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use domains::{DomainError, Session};

use crate::error::ApiError;
use crate::state::AppState;

/// The caller's session, if any. A missing or unrecognized token yields an
/// anonymous caller; the services decide whether that is acceptable.
#[derive(Debug, Clone, Copy)]
pub struct MaybeSession(pub Option<Session>);

impl MaybeSession {
    pub fn session(&self) -> Option<&Session> {
        self.0.as_ref()
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Self(None));
        };

        let session = state
            .sessions
            .resolve(token)
            .await
            .map_err(DomainError::Store)?;
        if session.is_none() {
            tracing::debug!("bearer token did not resolve to a session");
        }
        Ok(Self(session))
    }
}
