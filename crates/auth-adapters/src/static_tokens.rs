//! Fixed token → session table. For local development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use domains::{Session, SessionResolver};

#[derive(Debug, Clone, Default)]
pub struct StaticSessionResolver {
    sessions: HashMap<String, Session>,
}

impl StaticSessionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(mut self, token: impl Into<String>, session: Session) -> Self {
        self.sessions.insert(token.into(), session);
        self
    }
}

#[async_trait]
impl SessionResolver for StaticSessionResolver {
    async fn resolve(&self, bearer_token: &str) -> anyhow::Result<Option<Session>> {
        Ok(self.sessions.get(bearer_token).copied())
    }
}
