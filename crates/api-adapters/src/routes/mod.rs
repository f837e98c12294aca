//! API route definitions.

mod feed;
mod health;
mod messages;
mod preferences;
mod signup;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the complete router.
///
/// ## Public
/// - `GET /health`
/// - `GET /metrics`
/// - `GET /api/feed` - global feed, ignore list applied for signed-in viewers
/// - `GET /api/users/{username}/feed`
/// - `POST /api/signup/username`
/// - `POST /api/signup`
///
/// ## Session required
/// - `POST /api/messages`
/// - `GET|PUT /api/preferences`
/// - `PUT|DELETE /api/preferences/ignored/{username}`
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/feed", get(feed::global_feed))
        .route("/users/{username}/feed", get(feed::user_feed))
        .route("/messages", post(messages::create_message))
        .route(
            "/preferences",
            get(preferences::get_preferences).put(preferences::set_ignored),
        )
        .route(
            "/preferences/ignored/{username}",
            put(preferences::ignore_user).delete(preferences::unignore_user),
        )
        .route("/signup/username", post(signup::check_username))
        .route("/signup", post(signup::register));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .nest("/api", api)
        .with_state(state)
}
