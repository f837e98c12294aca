use axum::extract::{Path, Query, State};
use axum::Json;
use domains::FeedPage;

use crate::dto::FeedQuery;
use crate::error::ApiError;
use crate::metrics::FeedKind;
use crate::session::MaybeSession;
use crate::state::AppState;

pub async fn global_feed(
    State(state): State<AppState>,
    viewer: MaybeSession,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedPage>, ApiError> {
    let request = query.page_request(state.limits)?;
    let page = state
        .feed
        .get_visible_feed(
            viewer.session(),
            request,
            query.show_ignored,
            &state.preferences,
        )
        .await?;

    state.metrics.feed_served(FeedKind::Global);
    Ok(Json(page))
}

pub async fn user_feed(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedPage>, ApiError> {
    let request = query.page_request(state.limits)?;
    let page = state
        .feed
        .get_user_feed_by_username(&username, request)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {username}")))?;

    state.metrics.feed_served(FeedKind::User);
    Ok(Json(page))
}
