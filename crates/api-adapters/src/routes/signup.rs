use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use services::{SignupOutcome, UsernameAvailability};

use crate::dto::{availability_reasons, RegisteredUser, SignupRequest, UsernameCheckRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// Always 200; the body says whether the name is usable.
pub async fn check_username(
    State(state): State<AppState>,
    Json(request): Json<UsernameCheckRequest>,
) -> Result<Json<UsernameAvailability>, ApiError> {
    Ok(Json(state.signup.check_username(&request.username).await?))
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<RegisteredUser>), ApiError> {
    match state.signup.register(&request.email, &request.username).await? {
        SignupOutcome::Registered(user) => Ok((StatusCode::CREATED, Json(user.into()))),
        SignupOutcome::Rejected(availability) => {
            Err(ApiError::Rejected(availability_reasons(&availability)))
        }
        SignupOutcome::EmailInUse { .. } => Err(ApiError::Conflict(
            "An account with this email already exists".to_string(),
        )),
    }
}
