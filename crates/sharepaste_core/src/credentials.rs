//! Password hashing and the disclosure gate for protected pastes.
//!
//! Hashes are Argon2id PHC strings with a fresh random salt per paste. The
//! disclosure gate decides which projection of a record a caller receives:
//! content is only ever projected after a successful verification.

use crate::constants::{
    DEFAULT_HASH_ITERATIONS, DEFAULT_HASH_MEMORY_KIB, DEFAULT_HASH_PARALLELISM, MAX_PASSWORD_CHARS,
};
use crate::error::AppError;
use crate::models::paste::{LockedPaste, Paste, PasteView, UnlockedPaste};
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::{rngs::OsRng, RngCore};
use serde::Deserialize;

const SALT_LEN: usize = 16;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_HASH_MEMORY_KIB,
            iterations: DEFAULT_HASH_ITERATIONS,
            parallelism: DEFAULT_HASH_PARALLELISM,
        }
    }
}

/// Hashes and verifies paste passwords.
///
/// Both operations are CPU-bound by design; async callers should run them on a
/// blocking thread and never while holding a write transaction.
#[derive(Debug, Clone)]
pub struct CredentialGuard {
    params: Params,
}

impl CredentialGuard {
    /// Build a guard with the given Argon2id cost.
    ///
    /// # Errors
    /// Returns [`AppError::Credential`] when the cost is outside Argon2's
    /// accepted ranges (for example memory below `8 * parallelism` KiB).
    pub fn new(cost: HashCost) -> Result<Self, AppError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|err| AppError::Credential(format!("Invalid hash cost: {}", err)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a raw password with a fresh random salt.
    ///
    /// # Arguments
    /// - `raw`: Password as supplied by the submitter.
    ///
    /// # Returns
    /// A PHC-formatted Argon2id hash string.
    ///
    /// # Errors
    /// Returns [`AppError::Credential`] when salting or hashing fails.
    pub fn hash_password(&self, raw: &str) -> Result<String, AppError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes).map_err(credential_error)?;
        let hash = self
            .argon2()
            .hash_password(raw.as_bytes(), &salt)
            .map_err(credential_error)?;
        Ok(hash.to_string())
    }

    /// Check a candidate password against a stored hash.
    ///
    /// Cost parameters are read from the stored hash, so records hashed under
    /// an older cost keep verifying after the configured cost changes.
    ///
    /// # Returns
    /// `Ok(true)` on match, `Ok(false)` on mismatch.
    ///
    /// # Errors
    /// Returns [`AppError::Credential`] when the stored hash is malformed.
    pub fn verify_password(&self, raw: &str, stored_hash: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(stored_hash).map_err(credential_error)?;
        match self.argon2().verify_password(raw.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(credential_error(err)),
        }
    }
}

fn credential_error(err: password_hash::Error) -> AppError {
    AppError::Credential(err.to_string())
}

/// Validate a client-supplied password (1 to 128 characters).
///
/// # Errors
/// Returns [`AppError::InvalidInput`] when empty or too long.
pub fn validate_password(raw: &str) -> Result<(), AppError> {
    let chars = raw.chars().count();
    if chars == 0 {
        return Err(AppError::InvalidInput("Password must not be empty".to_string()));
    }
    if chars > MAX_PASSWORD_CHARS {
        return Err(AppError::InvalidInput(format!(
            "Password must be at most {} characters",
            MAX_PASSWORD_CHARS
        )));
    }
    Ok(())
}

/// Disclosure state of a record for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disclosure {
    /// Content withheld until the password is verified.
    Locked,
    /// Content may be returned.
    Unlocked,
}

impl Disclosure {
    /// State for a plain read: locked iff the record carries a password hash.
    pub fn for_read(paste: &Paste) -> Self {
        if paste.password_hash.is_some() {
            Self::Locked
        } else {
            Self::Unlocked
        }
    }
}

/// Project a record into the client view allowed by `disclosure`.
pub fn project(paste: &Paste, disclosure: Disclosure) -> PasteView {
    match disclosure {
        Disclosure::Locked => PasteView::Locked(LockedPaste::from(paste)),
        Disclosure::Unlocked => PasteView::Unlocked(UnlockedPaste::from(paste)),
    }
}
