//! # Domain Models
//!
//! These structs represent the core entities of the guestbook.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A guestbook entry. Root message when `parent_id` is `None`, reply otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    /// Message this one replies to. Never equal to `id`.
    pub parent_id: Option<Uuid>,
}

impl Message {
    /// Builds a new message stamped with a fresh v7 id and the current time.
    pub fn new(author_id: Uuid, body: String, parent_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::now_v7(),
            author_id,
            body,
            created_at: Utc::now(),
            parent_id,
        }
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// An identity owned by the external auth provider. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Username as the user chose to display it (e.g. different casing)
    pub display_username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            username: Some(self.username.clone()),
            display_username: self.display_username.clone(),
            name: self.name.clone(),
        }
    }
}

/// The author fields joined onto a feed entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub username: Option<String>,
    pub display_username: Option<String>,
    pub name: Option<String>,
}

impl AuthorSummary {
    /// Display-username, else username, else name.
    pub fn display_name(&self) -> Option<&str> {
        self.display_username
            .as_deref()
            .or(self.username.as_deref())
            .or(self.name.as_deref())
    }
}

/// Per-user ignore list. Exactly one record per user, created lazily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub user_id: Uuid,
    /// Insertion-ordered and duplicate-free. Never contains `user_id`.
    pub ignored_user_ids: Vec<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl PreferenceRecord {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            ignored_user_ids: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

/// Preferences as presented to their owner: ids resolved to current usernames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub ignored_usernames: Vec<String>,
}

/// What the identity collaborator tells us about an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email_verified: bool,
}

/// Identity data forwarded to the account registrar after signup validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
}

/// Result of handing a signup to the registrar. Uniqueness clashes are
/// ordinary outcomes; only infrastructure failures are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Created(User),
    /// Someone claimed the username between the availability check and the insert.
    UsernameTaken,
    EmailTaken,
}

/// Which messages a feed covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    All,
    Author(Uuid),
}

/// Summary of the message a reply points at. Empty fields mean the parent is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyContext {
    pub parent_id: Uuid,
    pub author: Option<String>,
    pub body: Option<String>,
}

/// One rendered row of a feed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    #[serde(flatten)]
    pub message: Message,
    pub author: Option<AuthorSummary>,
    pub reply_to: Option<ReplyContext>,
}

impl FeedEntry {
    pub fn author_display_name(&self) -> Option<&str> {
        self.author.as_ref().and_then(AuthorSummary::display_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(u64::from(page_size.max(1)));
        Self {
            page,
            page_size,
            total_count,
            total_pages,
            has_next: u64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }
}

/// A single page of a feed. Recomputed per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPage {
    pub entries: Vec<FeedEntry>,
    pub pagination: Pagination,
}
