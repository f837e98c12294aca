//! Store failures surface as `DomainError::Store`, never as validation results.

use std::sync::Arc;

use domains::{
    DomainError, MockMessageRepository, MockPreferenceRepository, MockUserDirectory, Session,
};
use services::{FeedService, PageRequest, PostService, PostingPolicy, PreferenceService, ProfanityFilter};
use uuid::Uuid;

fn session() -> Session {
    Session {
        user_id: Uuid::now_v7(),
        email_verified: true,
    }
}

#[tokio::test]
async fn failed_insert_is_a_store_error() {
    let mut messages = MockMessageRepository::new();
    messages
        .expect_insert_message()
        .returning(|_| Err(anyhow::anyhow!("connection reset")));

    let posts = PostService::new(
        Arc::new(messages),
        Arc::new(ProfanityFilter::new()),
        PostingPolicy::default(),
    );
    let err = posts
        .create_message(Some(&session()), "hello", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Store(_)));
}

#[tokio::test]
async fn failed_count_aborts_the_feed() {
    let mut messages = MockMessageRepository::new();
    messages
        .expect_count_messages()
        .returning(|_| Err(anyhow::anyhow!("timeout")));
    messages.expect_list_messages().never();

    let feed = FeedService::new(Arc::new(messages), Arc::new(MockUserDirectory::new()));
    let err = feed
        .get_feed(PageRequest::new(1, 10).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Store(_)));
}

#[tokio::test]
async fn failed_preference_write_is_reported() {
    let mut prefs = MockPreferenceRepository::new();
    prefs
        .expect_upsert_preferences()
        .returning(|_| Err(anyhow::anyhow!("disk full")));
    let mut users = MockUserDirectory::new();
    users.expect_find_by_usernames().returning(|_| Ok(Vec::new()));

    let service = PreferenceService::new(Arc::new(prefs), Arc::new(users));
    let err = service
        .set_ignored(Some(&session()), &["bob".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Store(_)));
}
