//! Shared test-only helpers for sharepaste_core.

use crate::credentials::{CredentialGuard, HashCost};
use crate::detection::Language;
use crate::models::paste::Paste;
use crate::Database;
use chrono::Utc;
use tempfile::TempDir;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
///
/// # Panics
/// Panics if temp-dir creation, path conversion, or database initialization
/// fails in the test environment.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

/// Credential guard with the cheapest parameters Argon2 accepts.
pub(crate) fn fast_guard() -> CredentialGuard {
    CredentialGuard::new(HashCost {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .expect("fast hash cost")
}

/// Public, never-expiring plaintext paste created now.
pub(crate) fn sample_paste(content: &str) -> Paste {
    Paste::new(content.to_string(), Language::Plaintext, Utc::now())
}
