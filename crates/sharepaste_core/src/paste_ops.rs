//! Paste lifecycle operations shared by the HTTP layer and maintenance tools.
//!
//! Each operation validates its input before touching storage and makes a
//! single attempt; nothing here retries. Password hashing and verification
//! are CPU-heavy, so async callers should run [`create_paste`] and
//! [`verify_paste`] on a blocking thread.

use crate::{
    constants::MAX_DELETE_TOKEN_LEN,
    credentials::{project, validate_password, CredentialGuard, Disclosure},
    db::AccessOutcome,
    detection::{self, Language},
    expiry::{resolve_expiry, ExpirySelection},
    ids,
    models::paste::{
        truncate_user_agent, CreatePasteRequest, CreatedPaste, Paste, PasteView, Submitter,
        UnlockedPaste,
    },
    AppError, Database, OriginHasher,
};
use chrono::{DateTime, Utc};

const UNKNOWN_ORIGIN: &str = "unknown";

/// Validate a paste id supplied by a client.
///
/// # Errors
/// Returns [`AppError::InvalidInput`] unless the id matches `^[A-Za-z0-9_-]{1,50}$`.
pub fn validate_id(id: &str) -> Result<(), AppError> {
    if ids::is_valid_id(id) {
        Ok(())
    } else {
        Err(AppError::InvalidInput("Invalid paste ID format".to_string()))
    }
}

fn validate_delete_token(token: &str) -> Result<(), AppError> {
    if token.is_empty() || token.len() > MAX_DELETE_TOKEN_LEN {
        return Err(AppError::InvalidInput(format!(
            "Delete token must be 1 to {} characters",
            MAX_DELETE_TOKEN_LEN
        )));
    }
    Ok(())
}

fn validate_content(content: &str, max_paste_size: usize) -> Result<(), AppError> {
    if content.is_empty() {
        return Err(AppError::InvalidInput(
            "Content must not be empty".to_string(),
        ));
    }
    if content.len() > max_paste_size {
        return Err(AppError::InvalidInput(format!(
            "Paste size exceeds maximum of {} bytes",
            max_paste_size
        )));
    }
    Ok(())
}

fn resolve_language(requested: Option<&str>, content: &str) -> Result<Language, AppError> {
    match requested.map(str::trim).filter(|value| !value.is_empty()) {
        Some(raw) => raw.parse(),
        None => Ok(detection::detect(content)),
    }
}

/// Fetch a row that may still be served, applying lazy expiry.
fn load_servable(db: &Database, id: &str, now: DateTime<Utc>) -> Result<Paste, AppError> {
    let paste = db
        .pastes
        .get(id)?
        .filter(|paste| !paste.is_deleted)
        .ok_or(AppError::NotFound)?;
    if !paste.is_live_at(now) {
        if db.pastes.expire_if_due(id, now)? {
            tracing::info!("Paste {} expired on read", id);
        }
        return Err(AppError::Gone);
    }
    Ok(paste)
}

fn disclose(db: &Database, id: &str, now: DateTime<Utc>) -> Result<UnlockedPaste, AppError> {
    match db.pastes.record_access(id, now)? {
        AccessOutcome::Disclosed(row) => Ok(UnlockedPaste::from(&row)),
        AccessOutcome::Expired => Err(AppError::Gone),
        AccessOutcome::Missing => Err(AppError::NotFound),
    }
}

/// Create a paste from a client request.
///
/// Content is stored byte-for-byte as submitted. A missing language is
/// filled in by [`detection::detect`].
///
/// # Arguments
/// - `db`: Open database handle.
/// - `guard`: Password hasher.
/// - `origin`: Requester origin hasher for the audit trail.
/// - `max_paste_size`: Content ceiling in bytes.
/// - `req`: Creation payload.
/// - `submitter`: Transport facts about the creator.
/// - `now`: Creation instant.
///
/// # Returns
/// The new id, its delete token, and the resolved expiry.
///
/// # Errors
/// Returns [`AppError::InvalidInput`] for empty or oversized content, an
/// unknown language or expiration, or an out-of-range password. Storage and
/// hashing failures propagate as internal errors.
pub fn create_paste(
    db: &Database,
    guard: &CredentialGuard,
    origin: &OriginHasher,
    max_paste_size: usize,
    req: CreatePasteRequest,
    submitter: &Submitter,
    now: DateTime<Utc>,
) -> Result<CreatedPaste, AppError> {
    validate_content(&req.content, max_paste_size)?;
    let language = resolve_language(req.language.as_deref(), &req.content)?;
    let selection = ExpirySelection::from_request(req.expiration.as_deref())?;
    if let Some(password) = req.password.as_deref() {
        validate_password(password)?;
    }

    let password_hash = req
        .password
        .as_deref()
        .map(|password| guard.hash_password(password))
        .transpose()?;

    let mut paste = Paste::new(req.content, language, now);
    paste.expires_at = resolve_expiry(selection, now);
    paste.password_hash = password_hash;
    paste.requester_hash = origin.hash(submitter.origin.as_deref().unwrap_or(UNKNOWN_ORIGIN));
    paste.user_agent = submitter.user_agent.as_deref().map(truncate_user_agent);

    db.pastes.create(&paste)?;
    tracing::info!(
        "Created paste {} (language={}, expiration={}, protected={})",
        paste.id,
        paste.language,
        selection,
        paste.password_hash.is_some()
    );
    Ok(CreatedPaste::from(&paste))
}

/// Read a paste by id.
///
/// Public pastes are disclosed and their access count bumped. Protected
/// pastes yield a password challenge and are not counted.
///
/// # Returns
/// [`PasteView::Unlocked`] or [`PasteView::Locked`].
///
/// # Errors
/// Returns [`AppError::InvalidInput`] for a malformed id,
/// [`AppError::NotFound`] for missing or deleted pastes, and
/// [`AppError::Gone`] when the paste expired (it is soft-deleted as a side effect).
pub fn read_paste(db: &Database, id: &str, now: DateTime<Utc>) -> Result<PasteView, AppError> {
    validate_id(id)?;
    let paste = load_servable(db, id, now)?;
    match Disclosure::for_read(&paste) {
        Disclosure::Locked => Ok(project(&paste, Disclosure::Locked)),
        Disclosure::Unlocked => disclose(db, id, now).map(PasteView::Unlocked),
    }
}

/// Unlock a protected paste with its password.
///
/// Verification happens outside any write transaction; only a successful
/// match bumps the access count.
///
/// # Returns
/// The full paste view with the post-increment access count.
///
/// # Errors
/// Returns [`AppError::Unauthorized`] for a wrong password or a paste that
/// has no password, plus the same `InvalidInput`/`NotFound`/`Gone` cases as
/// [`read_paste`].
pub fn verify_paste(
    db: &Database,
    guard: &CredentialGuard,
    id: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<UnlockedPaste, AppError> {
    validate_id(id)?;
    validate_password(password)?;
    let paste = load_servable(db, id, now)?;
    let Some(stored_hash) = paste.password_hash.as_deref() else {
        return Err(AppError::Unauthorized);
    };
    if !guard.verify_password(password, stored_hash)? {
        tracing::debug!("Rejected password for paste {}", id);
        return Err(AppError::Unauthorized);
    }
    disclose(db, id, now)
}

/// Soft-delete a paste with its delete token.
///
/// # Errors
/// Returns [`AppError::NotFound`] when the id is unknown, the token does not
/// match, or the paste is already deleted. The three cases are indistinguishable.
pub fn delete_paste(db: &Database, id: &str, token: &str) -> Result<(), AppError> {
    validate_id(id)?;
    validate_delete_token(token)?;
    if db.pastes.delete_with_token(id, token)? {
        tracing::info!("Deleted paste {}", id);
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

/// Soft-delete every paste that is past its expiry at `now`.
///
/// # Returns
/// Number of pastes flipped by this sweep.
///
/// # Errors
/// Propagates storage errors.
pub fn sweep_expired(db: &Database, now: DateTime<Utc>) -> Result<usize, AppError> {
    let flipped = db.pastes.sweep_expired(now)?;
    if flipped > 0 {
        tracing::info!("Expiry sweep soft-deleted {} paste(s)", flipped);
    } else {
        tracing::debug!("Expiry sweep found nothing due");
    }
    Ok(flipped)
}
