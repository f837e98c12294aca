//! # Preferences
//!
//! Get-or-create access to a user's ignore list, translating between the
//! stored user ids and the usernames callers deal in.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use domains::{PreferenceRecord, PreferenceRepository, Preferences, Result, Session, UserDirectory};
use uuid::Uuid;

use crate::authorize::require_session;

pub struct PreferenceService {
    prefs: Arc<dyn PreferenceRepository>,
    users: Arc<dyn UserDirectory>,
}

impl PreferenceService {
    pub fn new(prefs: Arc<dyn PreferenceRepository>, users: Arc<dyn UserDirectory>) -> Self {
        Self { prefs, users }
    }

    /// The caller's ignore list as current usernames, creating an empty
    /// record on first access.
    pub async fn get_preferences(&self, session: Option<&Session>) -> Result<Preferences> {
        let session = require_session(session, "view preferences")?;
        let ignored_usernames = self.ignored_usernames(session.user_id).await?;
        Ok(Preferences { ignored_usernames })
    }

    /// Replaces the caller's whole ignore list. Unknown usernames and the
    /// caller's own name are dropped.
    pub async fn set_ignored(&self, session: Option<&Session>, usernames: &[String]) -> Result<()> {
        let session = require_session(session, "update preferences")?;
        let ignored_user_ids = self.resolve_ids(session.user_id, usernames).await?;

        tracing::debug!(
            user_id = %session.user_id,
            requested = usernames.len(),
            resolved = ignored_user_ids.len(),
            "replacing ignore list"
        );

        self.prefs
            .upsert_preferences(PreferenceRecord {
                user_id: session.user_id,
                ignored_user_ids,
                updated_at: Utc::now(),
            })
            .await?;
        Ok(())
    }

    pub async fn ignore_user(&self, session: Option<&Session>, username: &str) -> Result<Preferences> {
        let mut current = self.get_preferences(session).await?.ignored_usernames;
        current.push(username.to_string());
        self.set_ignored(session, &current).await?;
        self.get_preferences(session).await
    }

    pub async fn unignore_user(&self, session: Option<&Session>, username: &str) -> Result<Preferences> {
        let mut current = self.get_preferences(session).await?.ignored_usernames;
        let target = username.to_lowercase();
        current.retain(|name| name.to_lowercase() != target);
        self.set_ignored(session, &current).await?;
        self.get_preferences(session).await
    }

    /// Ignore list of a known viewer, for feed filtering.
    pub async fn ignored_usernames(&self, user_id: Uuid) -> Result<Vec<String>> {
        let record = self.load_or_create(user_id).await?;
        if record.ignored_user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let names: HashMap<Uuid, String> = self
            .users
            .find_by_ids(&record.ignored_user_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.username))
            .collect();

        Ok(record
            .ignored_user_ids
            .iter()
            .filter_map(|id| names.get(id).cloned())
            .collect())
    }

    async fn load_or_create(&self, user_id: Uuid) -> Result<PreferenceRecord> {
        if let Some(record) = self.prefs.get_preferences(user_id).await? {
            return Ok(record);
        }
        tracing::debug!(user_id = %user_id, "creating default preferences");
        Ok(self
            .prefs
            .create_if_absent(PreferenceRecord::empty(user_id))
            .await?)
    }

    async fn resolve_ids(&self, owner: Uuid, usernames: &[String]) -> Result<Vec<Uuid>> {
        let mut seen = HashSet::new();
        let unique: Vec<String> = usernames
            .iter()
            .map(|name| name.to_lowercase())
            .filter(|name| seen.insert(name.clone()))
            .collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let ids: HashMap<String, Uuid> = self
            .users
            .find_by_usernames(&unique)
            .await?
            .into_iter()
            .map(|user| (user.username.to_lowercase(), user.id))
            .collect();

        let mut resolved = Vec::with_capacity(unique.len());
        for name in &unique {
            match ids.get(name) {
                Some(id) if *id != owner && !resolved.contains(id) => resolved.push(*id),
                _ => {}
            }
        }
        Ok(resolved)
    }
}
