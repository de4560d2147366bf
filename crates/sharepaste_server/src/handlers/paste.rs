//! Paste HTTP handlers.

use super::run_blocking;
use crate::{error::HttpError, extract::ApiJson, models::paste::*, paste_ops, AppState};
use axum::{
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::net::SocketAddr;

fn submitter_from(headers: &HeaderMap, peer: Option<SocketAddr>) -> Submitter {
    Submitter {
        origin: peer.map(|addr| addr.ip().to_string()),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    }
}

/// Create a new paste.
///
/// # Arguments
/// - `state`: Application state.
/// - `peer`: Client socket address, when the listener records it.
/// - `headers`: Request headers (for the user agent).
/// - `req`: Paste creation payload.
///
/// # Returns
/// `201 Created` with the id, delete token, and expiry.
///
/// # Errors
/// Returns an error if validation, hashing, or persistence fails.
pub async fn create_paste(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreatePasteRequest>,
) -> Result<(StatusCode, Json<CreatedPaste>), HttpError> {
    let submitter = submitter_from(&headers, peer.map(|ConnectInfo(addr)| addr));
    let created = run_blocking(move || {
        paste_ops::create_paste(
            &state.db,
            &state.guard,
            &state.origin,
            state.config.max_paste_size,
            req,
            &submitter,
            Utc::now(),
        )
    })
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a paste by ID.
///
/// Password-protected pastes come back locked, without content.
///
/// # Errors
/// Returns 400 for a malformed id, 404 when missing or deleted, 410 when expired.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PasteView>, HttpError> {
    Ok(Json(paste_ops::read_paste(&state.db, &id, Utc::now())?))
}

/// Unlock a password-protected paste.
///
/// # Errors
/// Returns 401 for a wrong password, plus the same cases as [`get_paste`].
pub async fn verify_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<VerifyPasteRequest>,
) -> Result<Json<UnlockedPaste>, HttpError> {
    let unlocked = run_blocking(move || {
        paste_ops::verify_paste(&state.db, &state.guard, &id, &req.password, Utc::now())
    })
    .await?;
    Ok(Json(unlocked))
}

/// Delete a paste with its delete token.
///
/// # Errors
/// Returns 404 when the paste is missing or the token does not match.
pub async fn delete_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<DeletePasteRequest>,
) -> Result<Json<Value>, HttpError> {
    paste_ops::delete_paste(&state.db, &id, &req.delete_token)?;
    Ok(Json(json!({ "message": "Paste deleted successfully" })))
}
