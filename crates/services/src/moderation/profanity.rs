//! Wordlist-based profanity detection.
//!
//! A filter is built once at startup and shared by reference (usually an
//! `Arc<ProfanityFilter>`) with every validator that needs it.

use std::collections::HashSet;

const DEFAULT_WORDLIST: &str = include_str!("wordlist.txt");

/// Case-insensitive, token-level profanity matcher.
#[derive(Debug, Clone)]
pub struct ProfanityFilter {
    words: HashSet<String>,
}

impl Default for ProfanityFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfanityFilter {
    /// Filter over the bundled English wordlist.
    pub fn new() -> Self {
        Self::from_words(DEFAULT_WORDLIST.lines())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Adds deployment-specific terms on top of the current list.
    pub fn with_extra_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
        self
    }

    /// Removes terms that a deployment wants to allow.
    pub fn without_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.words.remove(&word.as_ref().trim().to_lowercase());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn is_listed(&self, token: &str) -> bool {
        self.words.contains(&token.to_lowercase())
    }

    /// True iff some word-boundary-delimited token of `text` is on the list.
    pub fn is_profane(&self, text: &str) -> bool {
        text.split(|c: char| !is_word_char(c))
            .filter(|token| !token.is_empty())
            .any(|token| self.is_listed(token))
    }

    /// Masks every profane token with `*`, one per character.
    pub fn clean(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut token = String::new();

        for c in text.chars() {
            if is_word_char(c) {
                token.push(c);
                continue;
            }
            self.flush_token(&mut token, &mut out);
            out.push(c);
        }
        self.flush_token(&mut token, &mut out);
        out
    }

    fn flush_token(&self, token: &mut String, out: &mut String) {
        if token.is_empty() {
            return;
        }
        if self.is_listed(token) {
            out.extend(std::iter::repeat('*').take(token.chars().count()));
        } else {
            out.push_str(token);
        }
        token.clear();
    }
}

/// ASCII letters, digits, and underscore. Anything else splits tokens,
/// including accented letters.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
