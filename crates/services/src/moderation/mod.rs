//! # Lexical filters
//!
//! Pure functions over strings used by the username and message validators.

mod links;
mod patterns;
mod profanity;

pub use links::{extract_links, has_links, remove_links};
pub use patterns::{has_suspicious_pattern, matched_pattern};
pub use profanity::ProfanityFilter;

/// Hard cap applied by [`sanitize_content`].
pub const SANITIZED_MAX_CHARS: usize = 1000;

/// Trims, collapses whitespace runs to one space, strips C0/C1 control
/// characters, and truncates to [`SANITIZED_MAX_CHARS`].
pub fn sanitize_content(content: &str) -> String {
    content
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| !is_c0_or_c1_control(*c))
        .take(SANITIZED_MAX_CHARS)
        .collect()
}

fn is_c0_or_c1_control(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}')
}
