//! The router wired to the JWT session resolver, as the server binary does it.

mod common;

use std::sync::Arc;

use api_adapters::{router, with_http_layers, AppState, FeedLimits, Metrics};
use auth_adapters::JwtSessionResolver;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use common::World;
use secrecy::SecretString;
use serde_json::{json, Value};
use services::{FeedService, PostService, PostingPolicy, PreferenceService, SignupService};
use tower::ServiceExt;

fn app(world: &World, jwt: Arc<JwtSessionResolver>) -> Router {
    let store = world.store.clone();
    let state = AppState {
        feed: Arc::new(FeedService::new(store.clone(), store.clone())),
        posts: Arc::new(PostService::new(
            store.clone(),
            world.filter.clone(),
            PostingPolicy::default(),
        )),
        preferences: Arc::new(PreferenceService::new(store.clone(), store.clone())),
        signup: Arc::new(SignupService::new(
            store.clone(),
            store,
            world.filter.clone(),
        )),
        sessions: jwt,
        metrics: Arc::new(Metrics::new()),
        limits: FeedLimits::default(),
    };
    with_http_layers(router(state))
}

async fn post_message(app: &Router, token: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::post("/api/messages")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "body": body }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn signed_tokens_authorize_posting() {
    let world = World::new();
    let (alice, _) = world.user("alice");
    let jwt = Arc::new(JwtSessionResolver::new(&SecretString::from(
        "integration-secret".to_string(),
    )));
    let app = app(&world, jwt.clone());

    let token = jwt.issue(alice.id, true, Duration::hours(1)).unwrap();
    let (status, json) = post_message(&app, &token, "signed and sealed").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["author_id"], alice.id.to_string());
}

#[tokio::test]
async fn unverified_claims_are_forbidden_and_expired_tokens_anonymous() {
    let world = World::new();
    let (alice, _) = world.user("alice");
    let jwt = Arc::new(JwtSessionResolver::new(&SecretString::from(
        "integration-secret".to_string(),
    )));
    let app = app(&world, jwt.clone());

    let unverified = jwt.issue(alice.id, false, Duration::hours(1)).unwrap();
    let (status, _) = post_message(&app, &unverified, "hello").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let expired = jwt.issue(alice.id, true, Duration::hours(-3)).unwrap();
    let (status, json) = post_message(&app, &expired, "hello").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthorized");
}
