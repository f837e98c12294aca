//! Shared fixtures: an in-memory store with a few known users and the
//! services wired over it.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use domains::{Message, MessageRepository, Session, User};
use services::{
    FeedService, PostService, PostingPolicy, PreferenceService, ProfanityFilter, SignupService,
};
use storage_adapters::InMemoryStore;
use uuid::Uuid;

pub struct World {
    pub store: Arc<InMemoryStore>,
    pub filter: Arc<ProfanityFilter>,
    pub feed: FeedService,
    pub posts: PostService,
    pub preferences: PreferenceService,
    pub signup: SignupService,
}

impl World {
    pub fn new() -> Self {
        Self::with_policy(PostingPolicy::default())
    }

    pub fn with_policy(policy: PostingPolicy) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let filter = Arc::new(ProfanityFilter::new());
        Self {
            feed: FeedService::new(store.clone(), store.clone()),
            posts: PostService::new(store.clone(), filter.clone(), policy),
            preferences: PreferenceService::new(store.clone(), store.clone()),
            signup: SignupService::new(store.clone(), store.clone(), filter.clone()),
            filter,
            store,
        }
    }

    /// Adds a verified user and returns it with a matching session.
    pub fn user(&self, username: &str) -> (User, Session) {
        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            display_username: None,
            name: None,
            email: Some(format!("{username}@example.com")),
            email_verified: true,
            created_at: Utc::now(),
        };
        self.store.insert_user(user.clone()).expect("unique fixture username");
        let session = Session {
            user_id: user.id,
            email_verified: true,
        };
        (user, session)
    }

    /// Inserts a message directly, bypassing validation, at a fixed timestamp.
    pub async fn message_at(
        &self,
        author: &User,
        body: &str,
        created_at: DateTime<Utc>,
        parent_id: Option<Uuid>,
    ) -> Message {
        let message = Message {
            created_at,
            ..Message::new(author.id, body.to_string(), parent_id)
        };
        self.store
            .insert_message(message.clone())
            .await
            .expect("insert fixture message");
        message
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

pub fn minutes(n: i64) -> Duration {
    Duration::minutes(n)
}
