//! # Guestbook Binary
//!
//! Assembles the application from compile-time features and runtime settings.

#[cfg(not(feature = "web-axum"))]
compile_error!("the guestbook server needs the `web-axum` feature");

use std::sync::Arc;

use api_adapters::{router, with_http_layers, AppState, FeedLimits, Metrics};
use configs::{ModerationSettings, PostingPolicyKind, Settings};
use domains::{
    AccountRegistrar, MessageRepository, PreferenceRepository, SessionResolver, UserDirectory,
};
use services::{
    FeedService, PostService, PostingPolicy, PreferenceService, ProfanityFilter, SignupService,
    ValidationOptions,
};
use storage_adapters::InMemoryStore;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// One backend seen through every storage port.
struct Stores {
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserDirectory>,
    preferences: Arc<dyn PreferenceRepository>,
    registrar: Arc<dyn AccountRegistrar>,
}

impl Stores {
    fn from_backend<S>(backend: Arc<S>) -> Self
    where
        S: MessageRepository + UserDirectory + PreferenceRepository + AccountRegistrar + 'static,
    {
        Self {
            messages: backend.clone(),
            users: backend.clone(),
            preferences: backend.clone(),
            registrar: backend,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_tracing(&settings);

    let stores = open_stores(&settings).await?;
    let sessions = session_resolver(&settings)?;

    let filter = Arc::new(profanity_filter(&settings.moderation));
    tracing::info!(words = filter.len(), "profanity filter ready");

    let policy = posting_policy(&settings.moderation);
    tracing::info!(policy = ?policy, "posting policy selected");

    let state = AppState {
        feed: Arc::new(
            FeedService::new(stores.messages.clone(), stores.users.clone())
                .with_reply_preview_chars(settings.feed.reply_preview_chars),
        ),
        posts: Arc::new(PostService::new(stores.messages, filter.clone(), policy)),
        preferences: Arc::new(PreferenceService::new(
            stores.preferences,
            stores.users.clone(),
        )),
        signup: Arc::new(SignupService::new(stores.users, stores.registrar, filter)),
        sessions,
        metrics: Arc::new(Metrics::new()),
        limits: FeedLimits {
            default_page_size: settings.feed.default_page_size,
            max_page_size: settings.feed.max_page_size,
        },
    };

    let app = with_http_layers(router(state));

    let bind_addr = settings.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "guestbook listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("guestbook stopped");
    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.filter));

    let registry = tracing_subscriber::registry().with(filter);
    if settings.log.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[cfg(feature = "db-postgres")]
async fn open_stores(settings: &Settings) -> anyhow::Result<Stores> {
    use secrecy::ExposeSecret;
    use storage_adapters::PgStore;

    let Some(url) = settings.database.url.as_ref() else {
        tracing::warn!("no database.url configured; using the in-memory store");
        return Ok(Stores::from_backend(Arc::new(InMemoryStore::new())));
    };

    let store = PgStore::connect(url.expose_secret(), settings.database.max_connections).await?;
    store.migrate().await?;
    tracing::info!(
        max_connections = settings.database.max_connections,
        "connected to postgres"
    );
    Ok(Stores::from_backend(Arc::new(store)))
}

#[cfg(not(feature = "db-postgres"))]
async fn open_stores(settings: &Settings) -> anyhow::Result<Stores> {
    if settings.database.url.is_some() {
        tracing::warn!("database.url is set but postgres support is not compiled in");
    }
    tracing::warn!("using the in-memory store; data is lost on restart");
    Ok(Stores::from_backend(Arc::new(InMemoryStore::new())))
}

#[cfg(feature = "auth-jwt")]
fn session_resolver(settings: &Settings) -> anyhow::Result<Arc<dyn SessionResolver>> {
    let Some(secret) = settings.auth.jwt_secret.as_ref() else {
        anyhow::bail!("auth.jwt_secret is required (set GUESTBOOK__AUTH__JWT_SECRET)");
    };
    Ok(Arc::new(auth_adapters::JwtSessionResolver::new(secret)))
}

#[cfg(not(feature = "auth-jwt"))]
fn session_resolver(_settings: &Settings) -> anyhow::Result<Arc<dyn SessionResolver>> {
    tracing::warn!("built without auth-jwt; every caller is anonymous");
    Ok(Arc::new(auth_adapters::StaticSessionResolver::new()))
}

fn profanity_filter(moderation: &ModerationSettings) -> ProfanityFilter {
    ProfanityFilter::new()
        .with_extra_words(&moderation.extra_words)
        .without_words(&moderation.allowed_words)
}

fn posting_policy(moderation: &ModerationSettings) -> PostingPolicy {
    match moderation.posting_policy {
        PostingPolicyKind::Strict => PostingPolicy::Strict(ValidationOptions {
            allow_links: moderation.allow_links,
            max_links: moderation.max_links,
            allow_profanity: moderation.allow_profanity,
            min_length: moderation.min_length,
            max_length: moderation.max_length,
        }),
        PostingPolicyKind::ProfanityOnly => PostingPolicy::ProfanityOnly,
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
