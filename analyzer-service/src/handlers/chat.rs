use crate::dtos::{ChatRequest, ChatResponse};
use crate::services::generate_text;
use crate::services::metrics::Operation;
use crate::services::prompts::build_chat_prompt;
use crate::startup::AppState;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::{extract::State, Json};
use service_core::error::AppError;

pub const API_KEY_MISSING: &str =
    "API key not configured. Please set GOOGLE_API_KEY environment variable.";
pub const NO_MESSAGE: &str = "No message provided";
pub const NO_RESPONSE: &str = "No response generated";

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    // Credential check comes first, before the body is looked at.
    let provider = state
        .text_provider
        .as_deref()
        .ok_or_else(|| AppError::ServiceError(API_KEY_MISSING.to_string()))?;

    let Json(request) = payload.map_err(json_error)?;

    let message = request
        .message()
        .ok_or_else(|| AppError::BadRequest(NO_MESSAGE.to_string()))?;

    let prompt = build_chat_prompt(message, request.history());

    tracing::debug!(
        message_len = message.len(),
        history_len = request.history().len(),
        "Generating chat response"
    );

    let text = generate_text(provider, Operation::Chat, &prompt, &state.generation)
        .await
        .map_err(|e| AppError::ServiceError(format!("Error generating response: {}", e)))?
        .ok_or_else(|| AppError::ServiceError(NO_RESPONSE.to_string()))?;

    Ok(Json(ChatResponse::new(text, provider.model())))
}

/// Over-limit bodies stay 413; every other rejection is a malformed request.
fn json_error(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(rejection.body_text())
    } else {
        AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}
