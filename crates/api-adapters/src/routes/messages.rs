use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use domains::Message;
use services::PostOutcome;

use crate::dto::PostMessageRequest;
use crate::error::ApiError;
use crate::session::MaybeSession;
use crate::state::AppState;

/// Root message or reply. 201 with the stored message, 422 with reasons.
pub async fn create_message(
    State(state): State<AppState>,
    author: MaybeSession,
    Json(request): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let outcome = state
        .posts
        .create_message(author.session(), &request.body, request.parent_id)
        .await?;

    match outcome {
        PostOutcome::Created(message) => {
            state.metrics.message_posted();
            Ok((StatusCode::CREATED, Json(message)))
        }
        PostOutcome::Rejected(verdict) => {
            state.metrics.message_rejected(&verdict);
            Err(ApiError::Rejected(verdict.reasons()))
        }
    }
}
