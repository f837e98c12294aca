//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be used by the binary.
//! Store failures are opaque `anyhow` errors; "not found" is `None` or an
//! empty collection, never an error.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    FeedScope, Message, NewAccount, PreferenceRecord, Registration, Session, User,
};

/// Persistence contract for guestbook messages.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert_message(&self, message: Message) -> anyhow::Result<()>;
    async fn get_message(&self, id: Uuid) -> anyhow::Result<Option<Message>>;
    /// Membership-filtered read. Unknown ids are skipped.
    async fn get_messages(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Message>>;
    /// Newest first, ties broken by id descending.
    async fn list_messages(
        &self,
        scope: FeedScope,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<Message>>;
    async fn count_messages(&self, scope: FeedScope) -> anyhow::Result<u64>;
}

/// Bidirectional id ↔ username resolution against the identity store.
/// Username lookups are case-insensitive.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<User>>;
    async fn find_by_usernames(&self, usernames: &[String]) -> anyhow::Result<Vec<User>>;
}

/// Storage for per-user preference records.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    async fn get_preferences(&self, user_id: Uuid) -> anyhow::Result<Option<PreferenceRecord>>;
    /// Inserts `record` unless one already exists for the user. Returns the stored record.
    async fn create_if_absent(&self, record: PreferenceRecord) -> anyhow::Result<PreferenceRecord>;
    /// Single-statement replace. Last write wins.
    async fn upsert_preferences(&self, record: PreferenceRecord) -> anyhow::Result<()>;
}

/// Identity/session collaborator.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// `Ok(None)` for credentials that do not identify anyone.
    async fn resolve(&self, bearer_token: &str) -> anyhow::Result<Option<Session>>;
}

/// Receives signups whose username already passed validation.
/// Usernames and emails are unique regardless of case.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AccountRegistrar: Send + Sync {
    async fn register_account(&self, account: NewAccount) -> anyhow::Result<Registration>;
}
