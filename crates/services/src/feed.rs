//! # Feed assembly
//!
//! Builds paginated, reply-aware pages of messages. Joins (authors, reply
//! parents) happen here with batched membership reads, not in the store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use domains::{
    AuthorSummary, DomainError, FeedEntry, FeedPage, FeedScope, Message, MessageRepository,
    Pagination, ReplyContext, Result, Session, UserDirectory,
};
use uuid::Uuid;

use crate::preferences::PreferenceService;
use crate::visibility::apply_ignore_filter;

pub const DEFAULT_REPLY_PREVIEW_CHARS: usize = 140;

/// A validated `(page, page_size)` pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Result<Self> {
        if page == 0 {
            return Err(DomainError::InvalidRequest("page must be 1 or greater".into()));
        }
        if page_size == 0 {
            return Err(DomainError::InvalidRequest(
                "page size must be greater than 0".into(),
            ));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

pub struct FeedService {
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserDirectory>,
    reply_preview_chars: usize,
}

impl FeedService {
    pub fn new(messages: Arc<dyn MessageRepository>, users: Arc<dyn UserDirectory>) -> Self {
        Self {
            messages,
            users,
            reply_preview_chars: DEFAULT_REPLY_PREVIEW_CHARS,
        }
    }

    pub fn with_reply_preview_chars(mut self, chars: usize) -> Self {
        self.reply_preview_chars = chars;
        self
    }

    /// Global feed, newest first.
    pub async fn get_feed(&self, request: PageRequest) -> Result<FeedPage> {
        self.assemble(FeedScope::All, request).await
    }

    /// One author's messages (roots and replies), newest first.
    pub async fn get_user_feed(&self, author_id: Uuid, request: PageRequest) -> Result<FeedPage> {
        self.assemble(FeedScope::Author(author_id), request).await
    }

    /// `None` when no user has that username.
    pub async fn get_user_feed_by_username(
        &self,
        username: &str,
        request: PageRequest,
    ) -> Result<Option<FeedPage>> {
        match self.users.find_by_username(username).await? {
            Some(user) => Ok(Some(self.get_user_feed(user.id, request).await?)),
            None => {
                tracing::debug!(username, "feed requested for unknown user");
                Ok(None)
            }
        }
    }

    /// Global feed with the viewer's ignore list applied after pagination.
    pub async fn get_visible_feed(
        &self,
        viewer: Option<&Session>,
        request: PageRequest,
        show_ignored: bool,
        preferences: &PreferenceService,
    ) -> Result<FeedPage> {
        let mut page = self.get_feed(request).await?;

        let Some(viewer) = viewer else {
            return Ok(page);
        };
        if show_ignored {
            return Ok(page);
        }

        let ignored = preferences.ignored_usernames(viewer.user_id).await?;
        let before = page.entries.len();
        page.entries = apply_ignore_filter(page.entries, &ignored, false);

        tracing::debug!(
            user_id = %viewer.user_id,
            hidden = before - page.entries.len(),
            "applied ignore list"
        );
        Ok(page)
    }

    async fn assemble(&self, scope: FeedScope, request: PageRequest) -> Result<FeedPage> {
        let total_count = self.messages.count_messages(scope).await?;
        let pagination = Pagination::new(request.page(), request.page_size(), total_count);

        if request.offset() >= total_count {
            return Ok(FeedPage {
                entries: Vec::new(),
                pagination,
            });
        }

        let messages = self
            .messages
            .list_messages(scope, u64::from(request.page_size()), request.offset())
            .await?;

        let parents = self.load_parents(&messages).await?;
        let authors = self.load_authors(&messages, &parents).await?;

        let entries = messages
            .into_iter()
            .map(|message| {
                let reply_to = message
                    .parent_id
                    .map(|parent_id| self.reply_context(parent_id, &parents, &authors));
                FeedEntry {
                    author: authors.get(&message.author_id).cloned(),
                    reply_to,
                    message,
                }
            })
            .collect();

        Ok(FeedPage {
            entries,
            pagination,
        })
    }

    async fn load_parents(&self, messages: &[Message]) -> Result<HashMap<Uuid, Message>> {
        let parent_ids: Vec<Uuid> = unique(messages.iter().filter_map(|m| m.parent_id));
        if parent_ids.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(self
            .messages
            .get_messages(&parent_ids)
            .await?
            .into_iter()
            .map(|parent| (parent.id, parent))
            .collect())
    }

    async fn load_authors(
        &self,
        messages: &[Message],
        parents: &HashMap<Uuid, Message>,
    ) -> Result<HashMap<Uuid, AuthorSummary>> {
        let author_ids = unique(
            messages
                .iter()
                .chain(parents.values())
                .map(|m| m.author_id),
        );

        Ok(self
            .users
            .find_by_ids(&author_ids)
            .await?
            .iter()
            .map(|user| (user.id, user.summary()))
            .collect())
    }

    /// Empty fields when the parent no longer exists.
    fn reply_context(
        &self,
        parent_id: Uuid,
        parents: &HashMap<Uuid, Message>,
        authors: &HashMap<Uuid, AuthorSummary>,
    ) -> ReplyContext {
        match parents.get(&parent_id) {
            Some(parent) => ReplyContext {
                parent_id,
                author: authors
                    .get(&parent.author_id)
                    .and_then(AuthorSummary::display_name)
                    .map(str::to_string),
                body: Some(preview(&parent.body, self.reply_preview_chars)),
            },
            None => ReplyContext {
                parent_id,
                author: None,
                body: None,
            },
        }
    }
}

fn unique(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

fn preview(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}
