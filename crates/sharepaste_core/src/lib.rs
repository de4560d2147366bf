//! Core domain library for SharePaste (config, storage, models, access control).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across SharePaste crates.
pub mod constants;
/// Password hashing and the disclosure gate.
pub mod credentials;
/// Database access layer backed by redb.
pub mod db;
/// Content-based language auto-detection.
pub mod detection;
/// Process-global environment mutation helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Expiration choices and lazy-expiry checks.
pub mod expiry;
/// Random paste identifiers and delete tokens.
pub mod ids;
/// Data models for API requests and persistence.
pub mod models;
/// Keyed hashing of requester network origins.
pub mod origin;
/// Paste lifecycle operations shared by the HTTP layer and maintenance tools.
pub mod paste_ops;
#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::{DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT};
pub use credentials::CredentialGuard;
pub use db::Database;
pub use error::AppError;
pub use origin::OriginHasher;
