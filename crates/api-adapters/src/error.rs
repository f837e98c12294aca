//! API error types and response formatting.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::DomainError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A path resource the services report as absent (e.g. unknown username).
    #[error("not found: {0}")]
    NotFound(String),

    /// Content or username refused by policy. Carries one reason per rule.
    #[error("content rejected")]
    Rejected(Vec<String>),

    /// The request clashes with existing state (e.g. an email already registered).
    #[error("conflict: {0}")]
    Conflict(String),
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasons: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message, reasons) = match self {
            Self::Domain(DomainError::Unauthenticated(msg)) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", Some(msg), None)
            }
            Self::Domain(DomainError::EmailNotVerified(msg)) => {
                (StatusCode::FORBIDDEN, "email_not_verified", Some(msg), None)
            }
            Self::Domain(err @ DomainError::NotFound(..)) => {
                (StatusCode::NOT_FOUND, "not_found", Some(err.to_string()), None)
            }
            Self::Domain(DomainError::InvalidRequest(msg)) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg), None)
            }
            Self::Domain(DomainError::Store(err)) => {
                tracing::error!(error = %err, "store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    Some("An internal error occurred".to_string()),
                    None,
                )
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg), None),
            Self::Rejected(reasons) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "rejected",
                None,
                Some(reasons),
            ),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", Some(msg), None),
        };

        let body = ErrorResponse {
            error,
            message,
            reasons,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::Unauthenticated("x".into()), StatusCode::UNAUTHORIZED),
            (DomainError::EmailNotVerified("x".into()), StatusCode::FORBIDDEN),
            (DomainError::not_found("message", "abc"), StatusCode::NOT_FOUND),
            (DomainError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                DomainError::Store(anyhow::anyhow!("connection refused")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn rejections_are_unprocessable() {
        let response = ApiError::Rejected(vec!["Message cannot be empty".into()]).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn conflicts_are_409() {
        let response = ApiError::Conflict("email taken".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
