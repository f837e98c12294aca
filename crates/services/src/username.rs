//! # Username validation
//!
//! Structural and lexical rules, evaluated in order. The first failure wins,
//! so exactly one error is reported per rejected username. Uniqueness is a
//! separate, store-backed check (see [`crate::signup`]).

use serde::Serialize;
use thiserror::Error;

use crate::moderation::ProfanityFilter;

pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 20;

/// Names that would collide with routes, system accounts, or staff roles.
pub const RESERVED_USERNAMES: &[&str] = &[
    "admin", "api", "www", "mail", "ftp", "localhost", "root", "user", "test", "guest",
    "anonymous", "null", "undefined", "system", "support", "help", "info", "contact", "about",
    "terms", "privacy", "login", "signup", "register", "auth", "oauth", "profile", "settings",
    "account", "dashboard",
];

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsernameError {
    #[error("Username is required")]
    Required,
    #[error("Username cannot contain leading or trailing spaces")]
    SurroundingWhitespace,
    #[error("Username cannot contain spaces")]
    ContainsWhitespace,
    #[error("Username must be at least 3 characters long")]
    TooShort,
    #[error("Username must be 20 characters or less")]
    TooLong,
    #[error("Username can only contain letters, numbers, underscores, and hyphens")]
    InvalidCharacters,
    #[error("Username cannot start or end with underscores or hyphens")]
    InvalidEdge,
    #[error("Username contains inappropriate language")]
    Inappropriate,
    #[error("This username is reserved and cannot be used")]
    Reserved,
}

/// Outcome of [`validate_username`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsernameValidation {
    pub error: Option<UsernameError>,
    /// Trimmed input. Set on success, and on [`UsernameError::SurroundingWhitespace`]
    /// so callers can re-prompt with it.
    pub sanitized: Option<String>,
}

impl UsernameValidation {
    fn accept(sanitized: &str) -> Self {
        Self {
            error: None,
            sanitized: Some(sanitized.to_string()),
        }
    }

    fn reject(error: UsernameError) -> Self {
        Self {
            error: Some(error),
            sanitized: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

pub fn validate_username(raw: &str, filter: &ProfanityFilter) -> UsernameValidation {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return UsernameValidation::reject(UsernameError::Required);
    }

    if trimmed != raw {
        return UsernameValidation {
            error: Some(UsernameError::SurroundingWhitespace),
            sanitized: Some(trimmed.to_string()),
        };
    }

    if trimmed.chars().any(char::is_whitespace) {
        return UsernameValidation::reject(UsernameError::ContainsWhitespace);
    }

    let length = trimmed.chars().count();
    if length < USERNAME_MIN_CHARS {
        return UsernameValidation::reject(UsernameError::TooShort);
    }
    if length > USERNAME_MAX_CHARS {
        return UsernameValidation::reject(UsernameError::TooLong);
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return UsernameValidation::reject(UsernameError::InvalidCharacters);
    }

    let edges: &[char] = &['-', '_'];
    if trimmed.starts_with(edges) || trimmed.ends_with(edges) {
        return UsernameValidation::reject(UsernameError::InvalidEdge);
    }

    if filter.is_profane(trimmed) {
        return UsernameValidation::reject(UsernameError::Inappropriate);
    }

    let lowered = trimmed.to_ascii_lowercase();
    if RESERVED_USERNAMES.contains(&lowered.as_str()) {
        return UsernameValidation::reject(UsernameError::Reserved);
    }

    UsernameValidation::accept(trimmed)
}

/// Trims and removes every whitespace character.
pub fn sanitize_username(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}
