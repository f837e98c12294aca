use axum::extract::{Path, State};
use axum::Json;
use domains::Preferences;

use crate::dto::SetIgnoredRequest;
use crate::error::ApiError;
use crate::session::MaybeSession;
use crate::state::AppState;

pub async fn get_preferences(
    State(state): State<AppState>,
    owner: MaybeSession,
) -> Result<Json<Preferences>, ApiError> {
    Ok(Json(state.preferences.get_preferences(owner.session()).await?))
}

/// Full replacement of the ignore list. Responds with the stored result.
pub async fn set_ignored(
    State(state): State<AppState>,
    owner: MaybeSession,
    Json(request): Json<SetIgnoredRequest>,
) -> Result<Json<Preferences>, ApiError> {
    state
        .preferences
        .set_ignored(owner.session(), &request.ignored_usernames)
        .await?;
    Ok(Json(state.preferences.get_preferences(owner.session()).await?))
}

pub async fn ignore_user(
    State(state): State<AppState>,
    owner: MaybeSession,
    Path(username): Path<String>,
) -> Result<Json<Preferences>, ApiError> {
    Ok(Json(
        state
            .preferences
            .ignore_user(owner.session(), &username)
            .await?,
    ))
}

pub async fn unignore_user(
    State(state): State<AppState>,
    owner: MaybeSession,
    Path(username): Path<String>,
) -> Result<Json<Preferences>, ApiError> {
    Ok(Json(
        state
            .preferences
            .unignore_user(owner.session(), &username)
            .await?,
    ))
}
