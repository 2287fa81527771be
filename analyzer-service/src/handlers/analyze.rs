use crate::dtos::AnalysisResponse;
use crate::services::generate_text;
use crate::services::metrics::Operation;
use crate::services::prompts::{build_analysis_prompt, decode_file_content, has_numeric_data};
use crate::startup::AppState;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use service_core::error::AppError;

pub const API_KEY_MISSING: &str = "API key not configured";
pub const NO_FILE: &str = "No file provided";
pub const EMPTY_FILENAME: &str = "Empty filename";
pub const NO_ANALYSIS: &str = "Failed to analyze file";

/// Form field carrying the upload.
const FILE_FIELD: &str = "file";

pub async fn analyze_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let provider = state
        .text_provider
        .as_deref()
        .ok_or_else(|| AppError::ServiceError(API_KEY_MISSING.to_string()))?;

    // Anything that is not multipart/form-data simply has no file part.
    let mut multipart = multipart.map_err(|_| AppError::BadRequest(NO_FILE.to_string()))?;

    let (filename, bytes) = read_file_part(&mut multipart)
        .await?
        .ok_or_else(|| AppError::BadRequest(NO_FILE.to_string()))?;

    if filename.is_empty() {
        return Err(AppError::BadRequest(EMPTY_FILENAME.to_string()));
    }

    let content = decode_file_content(&bytes);
    let has_charts = has_numeric_data(&content);
    let prompt = build_analysis_prompt(&filename, &content);

    tracing::info!(
        filename = %filename,
        size_bytes = bytes.len(),
        has_charts,
        "Analyzing uploaded file"
    );

    let analysis = generate_text(provider, Operation::AnalyzeFile, &prompt, &state.generation)
        .await
        .map_err(|e| AppError::ServiceError(format!("Error analyzing file: {}", e)))?
        .ok_or_else(|| AppError::ServiceError(NO_ANALYSIS.to_string()))?;

    Ok(Json(AnalysisResponse::new(analysis, has_charts, filename)))
}

/// Find the first `file` part that carries a filename and read it fully.
///
/// A `file` part sent without a filename is a plain form value, not an upload,
/// and is skipped like any other field.
async fn read_file_part(
    multipart: &mut Multipart,
) -> Result<Option<(String, axum::body::Bytes)>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(Some((filename, bytes)));
    }

    Ok(None)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read upload: {}", e.body_text()))
    }
}
