mod common;

use common::World;
use domains::{DomainError, MessageRepository, Session};
use services::{MessageViolation, PostOutcome, PostingPolicy, ValidationOptions};
use tokio_test::assert_ok;

fn rejected_rules(outcome: PostOutcome) -> Vec<MessageViolation> {
    match outcome {
        PostOutcome::Rejected(verdict) => verdict.errors,
        PostOutcome::Created(message) => panic!("unexpectedly accepted: {}", message.body),
    }
}

#[tokio::test]
async fn strict_policy_collects_every_violation() {
    let world = World::new();
    let (_, session) = world.user("alice");

    let outcome = world
        .posts
        .create_message(Some(&session), "damn, see www.example.com", None)
        .await
        .unwrap();
    let rules = rejected_rules(outcome);
    assert!(rules.contains(&MessageViolation::Profanity));
    assert!(rules.contains(&MessageViolation::LinksNotAllowed));
    assert_eq!(world.store.message_count(), 0);
}

#[tokio::test]
async fn accepted_bodies_are_trimmed() {
    let world = World::new();
    let (_, session) = world.user("alice");

    let outcome = assert_ok!(
        world
            .posts
            .create_message(Some(&session), "   hello guestbook   ", None)
            .await
    );
    let PostOutcome::Created(message) = outcome else {
        panic!("should be accepted");
    };
    assert_eq!(message.body, "hello guestbook");
    let stored = world.store.get_message(message.id).await.unwrap();
    assert_eq!(stored.map(|m| m.body), Some("hello guestbook".to_string()));
}

#[tokio::test]
async fn profanity_only_policy_allows_links_but_caps_length() {
    let world = World::with_policy(PostingPolicy::ProfanityOnly);
    let (_, session) = world.user("alice");

    let outcome = world
        .posts
        .create_message(Some(&session), "see https://example.com", None)
        .await
        .unwrap();
    assert!(matches!(outcome, PostOutcome::Created(_)));

    let outcome = world
        .posts
        .create_message(Some(&session), &"a".repeat(501), None)
        .await
        .unwrap();
    assert_eq!(
        rejected_rules(outcome),
        vec![MessageViolation::TooLong { max: 500 }]
    );
}

#[tokio::test]
async fn custom_strict_options_apply() {
    let options = ValidationOptions {
        allow_links: true,
        max_links: 1,
        ..ValidationOptions::default()
    };
    let world = World::with_policy(PostingPolicy::Strict(options));
    let (_, session) = world.user("alice");

    let one = world
        .posts
        .create_message(Some(&session), "read https://example.com", None)
        .await
        .unwrap();
    assert!(matches!(one, PostOutcome::Created(_)));

    let two = world
        .posts
        .create_message(
            Some(&session),
            "read https://example.com and https://example.org",
            None,
        )
        .await
        .unwrap();
    assert_eq!(
        rejected_rules(two),
        vec![MessageViolation::TooManyLinks { max: 1 }]
    );
}

#[tokio::test]
async fn unverified_sessions_cannot_post() {
    let world = World::new();
    let (user, _) = world.user("alice");
    let unverified = Session {
        user_id: user.id,
        email_verified: false,
    };

    let err = world
        .posts
        .create_message(Some(&unverified), "hello", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::EmailNotVerified(_)));

    let err = world.posts.create_message(None, "hello", None).await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthenticated(_)));
}
