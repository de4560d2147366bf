//! Health and language-detection handlers.

use crate::{detection, error::HttpError, extract::ApiJson, models::paste::*, AppError};
use axum::{http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Unknown-route handler, so every error carries a JSON body.
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found" })),
    )
}

/// Guess the language of a snippet without storing it.
///
/// # Errors
/// Returns 400 when `content` is empty.
pub async fn detect_language(
    ApiJson(req): ApiJson<DetectLanguageRequest>,
) -> Result<Json<DetectedLanguage>, HttpError> {
    if req.content.is_empty() {
        return Err(AppError::InvalidInput("Content must not be empty".to_string()).into());
    }
    Ok(Json(DetectedLanguage {
        language: detection::detect(&req.content),
    }))
}
