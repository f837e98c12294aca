//! # In-memory store
//!
//! Implements every storage port over `DashMap`s. Used for local runs
//! without a database and throughout the test suites.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{
    AccountRegistrar, FeedScope, Message, MessageRepository, NewAccount, PreferenceRecord,
    PreferenceRepository, Registration, User, UserDirectory,
};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    messages: DashMap<Uuid, Message>,
    users: DashMap<Uuid, User>,
    /// lowercased username → user id
    usernames: DashMap<String, Uuid>,
    /// lowercased email → user id
    emails: DashMap<String, Uuid>,
    preferences: DashMap<Uuid, PreferenceRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an identity. Fails if the username or email is already taken.
    pub fn insert_user(&self, user: User) -> anyhow::Result<()> {
        match self.claim(&user) {
            Ok(()) => Ok(()),
            Err(Clash::Username) => anyhow::bail!("username {} already exists", user.username),
            Err(Clash::Email) => anyhow::bail!("email for {} already exists", user.username),
        }
    }

    /// Reserves the username and email of `user`, then stores it.
    /// Entries are always locked username first, then email.
    fn claim(&self, user: &User) -> Result<(), Clash> {
        let Entry::Vacant(name_slot) = self.usernames.entry(fold_case(&user.username)) else {
            return Err(Clash::Username);
        };
        if let Some(email) = user.email.as_deref() {
            match self.emails.entry(fold_case(email)) {
                Entry::Occupied(_) => return Err(Clash::Email),
                Entry::Vacant(slot) => {
                    slot.insert(user.id);
                }
            }
        }
        name_slot.insert(user.id);
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    /// Deletes a message outright. Replies to it keep their `parent_id`.
    pub fn remove_message(&self, id: Uuid) -> Option<Message> {
        self.messages.remove(&id).map(|(_, message)| message)
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    fn in_scope(message: &Message, scope: FeedScope) -> bool {
        match scope {
            FeedScope::All => true,
            FeedScope::Author(author_id) => message.author_id == author_id,
        }
    }
}

enum Clash {
    Username,
    Email,
}

fn fold_case(key: &str) -> String {
    key.to_lowercase()
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn insert_message(&self, message: Message) -> anyhow::Result<()> {
        if self.messages.contains_key(&message.id) {
            anyhow::bail!("message {} already exists", message.id);
        }
        self.messages.insert(message.id, message);
        Ok(())
    }

    async fn get_message(&self, id: Uuid) -> anyhow::Result<Option<Message>> {
        Ok(self.messages.get(&id).map(|m| m.value().clone()))
    }

    async fn get_messages(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Message>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.messages.get(id).map(|m| m.value().clone()))
            .collect())
    }

    async fn list_messages(
        &self,
        scope: FeedScope,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<Message>> {
        let mut matching: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| Self::in_scope(m.value(), scope))
            .map(|m| m.value().clone())
            .collect();

        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(matching
            .into_iter()
            .skip(usize::try_from(offset)?)
            .take(usize::try_from(limit)?)
            .collect())
    }

    async fn count_messages(&self, scope: FeedScope) -> anyhow::Result<u64> {
        let count = self
            .messages
            .iter()
            .filter(|m| Self::in_scope(m.value(), scope))
            .count();
        Ok(u64::try_from(count)?)
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let Some(id) = self.usernames.get(&fold_case(username)).map(|id| *id.value()) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.value().clone()))
            .collect())
    }

    async fn find_by_usernames(&self, usernames: &[String]) -> anyhow::Result<Vec<User>> {
        Ok(usernames
            .iter()
            .filter_map(|name| self.usernames.get(&fold_case(name)).map(|id| *id.value()))
            .filter_map(|id| self.users.get(&id).map(|u| u.value().clone()))
            .collect())
    }
}

#[async_trait]
impl PreferenceRepository for InMemoryStore {
    async fn get_preferences(&self, user_id: Uuid) -> anyhow::Result<Option<PreferenceRecord>> {
        Ok(self.preferences.get(&user_id).map(|p| p.value().clone()))
    }

    async fn create_if_absent(&self, record: PreferenceRecord) -> anyhow::Result<PreferenceRecord> {
        Ok(self
            .preferences
            .entry(record.user_id)
            .or_insert(record)
            .value()
            .clone())
    }

    async fn upsert_preferences(&self, record: PreferenceRecord) -> anyhow::Result<()> {
        self.preferences.insert(record.user_id, record);
        Ok(())
    }
}

#[async_trait]
impl AccountRegistrar for InMemoryStore {
    async fn register_account(&self, account: NewAccount) -> anyhow::Result<Registration> {
        let user = User {
            id: Uuid::now_v7(),
            username: account.username.clone(),
            display_username: None,
            name: Some(account.username),
            email: Some(account.email),
            email_verified: false,
            created_at: Utc::now(),
        };
        let registration = match self.claim(&user) {
            Ok(()) => {
                tracing::debug!(user_id = %user.id, "registered in-memory account");
                Registration::Created(user)
            }
            Err(Clash::Username) => Registration::UsernameTaken,
            Err(Clash::Email) => Registration::EmailTaken,
        };
        Ok(registration)
    }
}
