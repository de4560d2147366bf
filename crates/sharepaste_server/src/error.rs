//! HTTP error mapping for API handlers.

use crate::AppError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Wrapper that turns domain errors into JSON responses.
///
/// Client errors carry their message; every other error becomes a generic
/// 500 so storage and hashing details never reach the client.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct HttpError(#[from] pub AppError);

impl HttpError {
    /// Status code and client-visible message for this error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0 {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Paste not found".to_string()),
            AppError::Gone => (StatusCode::GONE, "Paste has expired".to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Invalid password".to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if !self.0.is_client_error() {
            tracing::error!("Request failed: {}", self.0);
        }
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}
