//! # Message validation
//!
//! Unlike username validation, every rule runs and every violation is
//! reported. Only an empty message short-circuits.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::moderation::{extract_links, has_suspicious_pattern, ProfanityFilter};

/// Word, whitespace, letter, number, punctuation, symbol, or mark.
static VALID_CHARACTERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w\s\p{L}\p{N}\p{P}\p{S}\p{M}]+$").expect("VALID_CHARACTERS regex")
});

/// Per-call-site message policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    pub allow_links: bool,
    pub max_links: usize,
    pub allow_profanity: bool,
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            allow_links: false,
            max_links: 0,
            allow_profanity: false,
            min_length: 1,
            max_length: 1000,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum MessageViolation {
    #[error("Message cannot be empty")]
    Empty,
    #[error("Message must be at least {min} characters long")]
    TooShort { min: usize },
    #[error("Message must be no more than {max} characters long")]
    TooLong { max: usize },
    #[error("Message contains inappropriate language")]
    Profanity,
    #[error("Links are not allowed in messages")]
    LinksNotAllowed,
    #[error("Maximum {max} links allowed per message")]
    TooManyLinks { max: usize },
    #[error("Message contains invalid characters")]
    InvalidCharacters,
    #[error("Message contains suspicious content")]
    SuspiciousContent,
}

impl MessageViolation {
    /// Stable short label, used as a metrics dimension.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooShort { .. } => "too_short",
            Self::TooLong { .. } => "too_long",
            Self::Profanity => "profanity",
            Self::LinksNotAllowed => "links_not_allowed",
            Self::TooManyLinks { .. } => "too_many_links",
            Self::InvalidCharacters => "invalid_characters",
            Self::SuspiciousContent => "suspicious_content",
        }
    }
}

/// Outcome of a message validation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<MessageViolation>,
    /// Trimmed text, present only when valid.
    pub sanitized_content: Option<String>,
}

impl ValidationResult {
    pub(crate) fn from_errors(errors: Vec<MessageViolation>, trimmed: &str) -> Self {
        let sanitized_content = errors.is_empty().then(|| trimmed.to_string());
        Self {
            errors,
            sanitized_content,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable reasons, one per violated rule.
    pub fn reasons(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

pub fn validate_message(
    raw: &str,
    options: &ValidationOptions,
    filter: &ProfanityFilter,
) -> ValidationResult {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ValidationResult::from_errors(vec![MessageViolation::Empty], trimmed);
    }

    let mut errors = Vec::new();
    let length = trimmed.chars().count();

    if length < options.min_length {
        errors.push(MessageViolation::TooShort {
            min: options.min_length,
        });
    }

    if length > options.max_length {
        errors.push(MessageViolation::TooLong {
            max: options.max_length,
        });
    }

    if !options.allow_profanity && filter.is_profane(trimmed) {
        errors.push(MessageViolation::Profanity);
    }

    let links = extract_links(trimmed);
    if !options.allow_links && !links.is_empty() {
        errors.push(MessageViolation::LinksNotAllowed);
    } else if options.allow_links && links.len() > options.max_links {
        errors.push(MessageViolation::TooManyLinks {
            max: options.max_links,
        });
    }

    if !VALID_CHARACTERS.is_match(trimmed) {
        errors.push(MessageViolation::InvalidCharacters);
    }

    if has_suspicious_pattern(trimmed) {
        errors.push(MessageViolation::SuspiciousContent);
    }

    ValidationResult::from_errors(errors, trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(raw: &str) -> ValidationResult {
        validate_message(raw, &ValidationOptions::default(), &ProfanityFilter::new())
    }

    #[test]
    fn accepts_plain_message_and_trims_it() {
        let result = check("  Thanks for the lovely evening!  ");
        assert!(result.is_valid());
        assert_eq!(
            result.sanitized_content.as_deref(),
            Some("Thanks for the lovely evening!")
        );
    }

    #[test]
    fn empty_short_circuits() {
        let result = check(" \n\t ");
        assert_eq!(result.errors, vec![MessageViolation::Empty]);
        assert_eq!(result.sanitized_content, None);
    }

    #[test]
    fn accumulates_every_violation() {
        let body = format!("shit, see example.com {}", "a".repeat(1000));
        let result = check(&body);

        assert!(!result.is_valid());
        assert_eq!(
            result.errors,
            vec![
                MessageViolation::TooLong { max: 1000 },
                MessageViolation::Profanity,
                MessageViolation::LinksNotAllowed,
            ]
        );
        assert_eq!(result.reasons().len(), 3);
        assert_eq!(result.sanitized_content, None);
    }

    #[test]
    fn link_budget_when_links_allowed() {
        let options = ValidationOptions {
            allow_links: true,
            max_links: 1,
            ..ValidationOptions::default()
        };
        let filter = ProfanityFilter::new();

        assert!(validate_message("see example.com", &options, &filter).is_valid());

        let result = validate_message("see example.com and example.org", &options, &filter);
        assert_eq!(result.errors, vec![MessageViolation::TooManyLinks { max: 1 }]);
        assert_eq!(result.reasons(), vec!["Maximum 1 links allowed per message"]);
    }

    #[test]
    fn file_names_are_not_links() {
        assert!(check("edit snake_case.py today").is_valid());
        assert!(check("renamed my_notes.md").is_valid());
    }

    #[test]
    fn profanity_can_be_allowed() {
        let options = ValidationOptions {
            allow_profanity: true,
            ..ValidationOptions::default()
        };
        assert!(validate_message("oh shit", &options, &ProfanityFilter::new()).is_valid());
    }

    #[test]
    fn min_length_is_enforced() {
        let options = ValidationOptions {
            min_length: 5,
            ..ValidationOptions::default()
        };
        let result = validate_message("hey", &options, &ProfanityFilter::new());
        assert_eq!(result.errors, vec![MessageViolation::TooShort { min: 5 }]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let options = ValidationOptions {
            max_length: 3,
            ..ValidationOptions::default()
        };
        assert!(validate_message("héé", &options, &ProfanityFilter::new()).is_valid());
    }

    #[test]
    fn control_characters_are_invalid() {
        let result = check("ring the bell\u{0007}");
        assert_eq!(result.errors, vec![MessageViolation::InvalidCharacters]);
    }

    #[test]
    fn unicode_text_and_emoji_are_valid() {
        assert!(check("Grüße aus Köln 🎉 — ¡hola!").is_valid());
    }

    #[test]
    fn suspicious_content_is_flagged() {
        let result = check("<script>alert('hi')</script>");
        assert!(result.errors.contains(&MessageViolation::SuspiciousContent));
    }
}
