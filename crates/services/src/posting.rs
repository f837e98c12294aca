//! # Posting
//!
//! Authorization, content policy, and persistence for new messages and replies.

use std::sync::Arc;

use domains::{DomainError, Message, MessageRepository, Result, Session};
use uuid::Uuid;

use crate::authorize::require_verified;
use crate::message::{validate_message, MessageViolation, ValidationOptions, ValidationResult};
use crate::moderation::ProfanityFilter;

/// Length cap of the posting form on the simple path.
pub const INPUT_SURFACE_MAX_CHARS: usize = 500;

/// How strictly a call site vets message bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostingPolicy {
    /// Every rule of the message validator.
    Strict(ValidationOptions),
    /// The live posting form: non-empty, input-surface length cap, profanity.
    ProfanityOnly,
}

impl Default for PostingPolicy {
    fn default() -> Self {
        Self::Strict(ValidationOptions::default())
    }
}

impl PostingPolicy {
    pub fn check(&self, raw: &str, filter: &ProfanityFilter) -> ValidationResult {
        match self {
            Self::Strict(options) => validate_message(raw, options, filter),
            Self::ProfanityOnly => check_profanity_only(raw, filter),
        }
    }
}

fn check_profanity_only(raw: &str, filter: &ProfanityFilter) -> ValidationResult {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ValidationResult::from_errors(vec![MessageViolation::Empty], trimmed);
    }

    let mut errors = Vec::new();
    if trimmed.chars().count() > INPUT_SURFACE_MAX_CHARS {
        errors.push(MessageViolation::TooLong {
            max: INPUT_SURFACE_MAX_CHARS,
        });
    }
    if filter.is_profane(trimmed) {
        errors.push(MessageViolation::Profanity);
    }
    ValidationResult::from_errors(errors, trimmed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    Created(Message),
    Rejected(ValidationResult),
}

pub struct PostService {
    messages: Arc<dyn MessageRepository>,
    filter: Arc<ProfanityFilter>,
    policy: PostingPolicy,
}

impl PostService {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        filter: Arc<ProfanityFilter>,
        policy: PostingPolicy,
    ) -> Self {
        Self {
            messages,
            filter,
            policy,
        }
    }

    pub fn policy(&self) -> &PostingPolicy {
        &self.policy
    }

    /// Posts a root message, or a reply when `parent_id` is set.
    ///
    /// Requires a verified session. A missing parent is `NotFound`; content
    /// problems come back as `PostOutcome::Rejected`, not as an error.
    pub async fn create_message(
        &self,
        session: Option<&Session>,
        body: &str,
        parent_id: Option<Uuid>,
    ) -> Result<PostOutcome> {
        let session = require_verified(session, "post a message")?;

        let verdict = self.policy.check(body, &self.filter);
        let Some(content) = verdict.sanitized_content.clone() else {
            tracing::debug!(
                user_id = %session.user_id,
                reasons = ?verdict.reasons(),
                "message rejected by content policy"
            );
            return Ok(PostOutcome::Rejected(verdict));
        };

        if let Some(parent_id) = parent_id {
            if self.messages.get_message(parent_id).await?.is_none() {
                return Err(DomainError::not_found("message", parent_id));
            }
        }

        let message = Message::new(session.user_id, content, parent_id);
        self.messages.insert_message(message.clone()).await?;

        tracing::info!(
            message_id = %message.id,
            user_id = %session.user_id,
            reply = message.is_reply(),
            "message posted"
        );
        Ok(PostOutcome::Created(message))
    }
}
