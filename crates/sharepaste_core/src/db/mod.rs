//! Database layer for SharePaste, backed by a single redb file.
//!
//! redb serializes write transactions, so every check-and-set in
//! [`paste::PasteDb`] runs inside one write transaction and is atomic with
//! respect to concurrent requests and the background sweeper.

/// Paste storage operations.
pub mod paste;
/// redb table definitions.
pub mod tables;

use crate::error::AppError;
use std::path::Path;
use std::sync::Arc;

pub use paste::{AccessOutcome, PasteDb};

/// Database handle with access to the paste tables.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub pastes: PasteDb,
}

impl Database {
    /// Open (or create) the database under the directory `path`.
    ///
    /// # Arguments
    /// - `path`: Directory that holds the redb file; created when missing.
    ///
    /// # Returns
    /// A ready-to-use [`Database`] with all tables initialized.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created or redb fails to
    /// open the file (for example because another process holds it).
    pub fn new(path: &str) -> Result<Self, AppError> {
        std::fs::create_dir_all(path).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                path, err
            ))
        })?;
        let file = Path::new(path).join(tables::REDB_FILE_NAME);
        let db = redb::Database::create(&file)?;
        tracing::debug!("Opened database at {}", file.display());
        Self::from_shared(Arc::new(db))
    }

    /// Build a database handle from an existing shared redb instance.
    ///
    /// # Returns
    /// A new [`Database`] wrapper that shares the underlying redb instance.
    ///
    /// # Errors
    /// Returns an error if the required tables cannot be created.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        Ok(Self {
            pastes: PasteDb::new(db.clone())?,
            db,
        })
    }
}
