use crate::dtos::HealthResponse;
use crate::startup::AppState;
use axum::{extract::State, Json};

/// Always 200. Reports whether the API key was present at startup.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.api_key_configured()))
}
