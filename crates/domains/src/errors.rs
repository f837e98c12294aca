//! # DomainError
//!
//! Centralized error handling for the guestbook.
//! Content-policy rejections are NOT errors; they travel as validation results.

use thiserror::Error;

/// The primary error type for all service operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// No session on a privileged action (post, reply, preferences)
    #[error("authentication required: {0}")]
    Unauthenticated(String),

    /// Session present but the email address is not verified yet
    #[error("email verification required: {0}")]
    EmailNotVerified(String),

    /// Resource not found (e.g., parent message of a reply)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Malformed request parameters (e.g., page 0)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Infrastructure failure (e.g., DB down)
    #[error("store failure: {0}")]
    Store(#[from] anyhow::Error),
}

impl DomainError {
    pub fn not_found(kind: &str, key: impl ToString) -> Self {
        Self::NotFound(kind.to_string(), key.to_string())
    }

    /// Whether the client must sign in or verify rather than fix its input.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthenticated(_) | Self::EmailNotVerified(_))
    }
}

/// A specialized Result type for guestbook logic.
pub type Result<T> = std::result::Result<T, DomainError>;
