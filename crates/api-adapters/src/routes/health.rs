use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use domains::DomainError;
use serde::Serialize;

use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .metrics
        .render()
        .map_err(|err| DomainError::Store(anyhow::Error::new(err)))?;
    Ok(([(header::CONTENT_TYPE, metrics::CONTENT_TYPE)], body))
}
