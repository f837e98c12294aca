//! # Seed
//!
//! Fills a Postgres database with demo users, a few messages and a reply,
//! then prints a bearer token per user for trying the API by hand.

use auth_adapters::JwtSessionResolver;
use chrono::{Duration, Utc};
use configs::Settings;
use domains::{FeedScope, Message, MessageRepository, User, UserDirectory};
use secrecy::ExposeSecret;
use storage_adapters::PgStore;
use uuid::Uuid;

const DEMO_USERS: &[(&str, &str)] = &[("alice", "Alice"), ("bob", "Bob"), ("carol", "Carol")];

const DEMO_MESSAGES: &[(&str, &str)] = &[
    ("alice", "Welcome to the guestbook! Say hello."),
    ("bob", "Hello from Bob. Lovely little corner of the web."),
    ("carol", "Signing in to say the coffee recommendations were spot on."),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = Settings::load()?;
    let Some(url) = settings.database.url.as_ref() else {
        anyhow::bail!("database.url is required (set GUESTBOOK__DATABASE__URL)");
    };
    let Some(secret) = settings.auth.jwt_secret.as_ref() else {
        anyhow::bail!("auth.jwt_secret is required (set GUESTBOOK__AUTH__JWT_SECRET)");
    };

    let store = PgStore::connect(url.expose_secret(), settings.database.max_connections).await?;
    store.migrate().await?;
    let jwt = JwtSessionResolver::new(secret);

    let mut users = Vec::with_capacity(DEMO_USERS.len());
    for (username, name) in DEMO_USERS {
        let user = match store.find_by_username(username).await? {
            Some(existing) => existing,
            None => {
                let user = User {
                    id: Uuid::now_v7(),
                    username: (*username).to_string(),
                    display_username: None,
                    name: Some((*name).to_string()),
                    email: Some(format!("{username}@example.com")),
                    email_verified: true,
                    created_at: Utc::now(),
                };
                store.insert_user(&user).await?;
                tracing::info!(username, "created demo user");
                user
            }
        };
        users.push(user);
    }

    seed_messages(&store, &users).await?;

    let ttl = Duration::seconds(settings.auth.token_ttl_secs);
    for user in &users {
        let token = jwt.issue(user.id, user.email_verified, ttl)?;
        println!("{}\t{}", user.username, token);
    }
    Ok(())
}

/// Posts the demo messages unless the feed already has content.
/// Returns whether anything was written.
async fn seed_messages(store: &dyn MessageRepository, users: &[User]) -> anyhow::Result<bool> {
    let existing = store.count_messages(FeedScope::All).await?;
    if existing > 0 {
        tracing::info!(existing, "feed already has messages; skipping message seed");
        return Ok(false);
    }

    let mut root = None;
    for (offset, (username, body)) in (0i64..).zip(DEMO_MESSAGES) {
        let Some(author) = users.iter().find(|u| u.username == *username) else {
            continue;
        };
        let message = Message {
            created_at: Utc::now() - Duration::minutes(30 - offset),
            ..Message::new(author.id, (*body).to_string(), None)
        };
        store.insert_message(message.clone()).await?;
        root.get_or_insert(message);
    }

    if let (Some(root), Some(replier)) = (root, users.get(1)) {
        let reply = Message::new(
            replier.id,
            "Thanks for setting this up!".to_string(),
            Some(root.id),
        );
        store.insert_message(reply).await?;
    }
    tracing::info!(messages = DEMO_MESSAGES.len() + 1, "seeded messages");
    Ok(true)
}
