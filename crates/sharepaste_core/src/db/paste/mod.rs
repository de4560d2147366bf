//! Paste storage operations backed by redb.
//!
//! Rows are never physically removed. Every state change is a conditional
//! update inside one write transaction: the condition is re-read from the
//! committed row, so a flip that lost a race is a no-op instead of a
//! double-apply.

use crate::{db::tables::*, error::AppError, expiry::is_expired, models::paste::Paste};
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// Result of a conditional access bump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessOutcome {
    /// The paste was live; carries the row after the bump.
    Disclosed(Paste),
    /// The paste was past its expiry and has now been soft-deleted.
    Expired,
    /// No live row with that id.
    Missing,
}

/// Accessor for paste-related redb tables.
pub struct PasteDb {
    db: Arc<redb::Database>,
}

pub(crate) fn deserialize_paste(bytes: &[u8]) -> Result<Paste, bincode::Error> {
    bincode::deserialize::<Paste>(bytes)
}

pub(crate) fn expiry_key(expires_at: DateTime<Utc>) -> u64 {
    // Pre-epoch instants clamp to zero; they are already due either way.
    expires_at.timestamp_millis().max(0) as u64
}

fn load_paste(pastes: &redb::Table<&str, &[u8]>, id: &str) -> Result<Option<Paste>, AppError> {
    let Some(guard) = pastes.get(id)? else {
        return Ok(None);
    };
    Ok(Some(deserialize_paste(guard.value())?))
}

fn store_paste(pastes: &mut redb::Table<&str, &[u8]>, paste: &Paste) -> Result<(), AppError> {
    let encoded = bincode::serialize(paste)?;
    pastes.insert(paste.id.as_str(), encoded.as_slice())?;
    Ok(())
}

/// Soft-delete `paste` and drop its expiry index entry.
fn mark_deleted(
    pastes: &mut redb::Table<&str, &[u8]>,
    by_expiry: &mut redb::Table<(u64, &str), ()>,
    paste: &mut Paste,
) -> Result<(), AppError> {
    paste.is_deleted = true;
    if let Some(expires_at) = paste.expires_at {
        let _ = by_expiry.remove((expiry_key(expires_at), paste.id.as_str()))?;
    }
    store_paste(pastes, paste)
}

/// Compare delete tokens without an early exit on the first differing byte.
fn tokens_match(stored: &str, candidate: &str) -> bool {
    blake3::hash(stored.as_bytes()) == blake3::hash(candidate.as_bytes())
}

impl PasteDb {
    /// Initialize paste tables if they do not exist yet.
    ///
    /// # Returns
    /// A new [`PasteDb`] accessor bound to `db`.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.open_table(PASTES_BY_EXPIRY)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new paste row and its expiry index entry atomically.
    ///
    /// # Arguments
    /// - `paste`: Paste row to persist.
    ///
    /// # Returns
    /// `Ok(())` when the insert commits.
    ///
    /// # Errors
    /// Returns an error when serialization fails, the id already exists, or
    /// storage operations fail.
    pub fn create(&self, paste: &Paste) -> Result<(), AppError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            if pastes.get(paste.id.as_str())?.is_some() {
                return Err(AppError::StorageMessage(format!(
                    "Paste id '{}' already exists",
                    paste.id
                )));
            }

            store_paste(&mut pastes, paste)?;
            if let (Some(expires_at), false) = (paste.expires_at, paste.is_deleted) {
                by_expiry.insert((expiry_key(expires_at), paste.id.as_str()), ())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Fetch a paste row by id, deleted or not.
    ///
    /// # Returns
    /// `Ok(Some(paste))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        match pastes.get(id)? {
            Some(value) => Ok(Some(deserialize_paste(value.value())?)),
            None => Ok(None),
        }
    }

    /// Count one disclosure of a live paste.
    ///
    /// Increments `access_count` and sets `last_accessed_at` iff the row is
    /// live and unexpired at `now`. An expired live row is soft-deleted
    /// instead (lazy expiry).
    ///
    /// # Arguments
    /// - `id`: Paste id.
    /// - `now`: Instant used for the expiry check and the access timestamp.
    ///
    /// # Returns
    /// The [`AccessOutcome`] observed inside the transaction.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn record_access(&self, id: &str, now: DateTime<Utc>) -> Result<AccessOutcome, AppError> {
        let write_txn = self.db.begin_write()?;
        let outcome = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            match load_paste(&pastes, id)? {
                Some(paste) if paste.is_deleted => AccessOutcome::Missing,
                None => AccessOutcome::Missing,
                Some(mut paste) if is_expired(paste.expires_at, now) => {
                    mark_deleted(&mut pastes, &mut by_expiry, &mut paste)?;
                    AccessOutcome::Expired
                }
                Some(mut paste) => {
                    paste.access_count = paste.access_count.saturating_add(1);
                    paste.last_accessed_at = Some(now);
                    store_paste(&mut pastes, &paste)?;
                    AccessOutcome::Disclosed(paste)
                }
            }
        };
        write_txn.commit()?;
        Ok(outcome)
    }

    /// Soft-delete a paste iff it is live and past its expiry at `now`.
    ///
    /// # Returns
    /// `true` when this call performed the flip.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn expire_if_due(&self, id: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        let flipped = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            match load_paste(&pastes, id)? {
                Some(mut paste) if !paste.is_deleted && is_expired(paste.expires_at, now) => {
                    mark_deleted(&mut pastes, &mut by_expiry, &mut paste)?;
                    true
                }
                _ => false,
            }
        };
        write_txn.commit()?;
        Ok(flipped)
    }

    /// Soft-delete a paste iff the id exists, the token matches, and the row is live.
    ///
    /// Expired-but-unswept rows still count as live here so their owner can
    /// delete them explicitly.
    ///
    /// # Returns
    /// `true` when this call performed the flip; `false` for a missing id,
    /// a wrong token, or an already-deleted row.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn delete_with_token(&self, id: &str, token: &str) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        let flipped = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            match load_paste(&pastes, id)? {
                Some(mut paste)
                    if !paste.is_deleted && tokens_match(&paste.delete_token, token) =>
                {
                    mark_deleted(&mut pastes, &mut by_expiry, &mut paste)?;
                    true
                }
                _ => false,
            }
        };
        write_txn.commit()?;
        Ok(flipped)
    }

    /// Soft-delete every live paste whose expiry is at or before `now`.
    ///
    /// Walks the expiry index in ascending order and stops at the first
    /// entry that is not yet due.
    ///
    /// # Returns
    /// Number of rows flipped by this call.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let now_key = expiry_key(now);
        let write_txn = self.db.begin_write()?;
        let flipped = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            let mut due = Vec::new();
            for item in by_expiry.iter()? {
                let (key, _) = item?;
                let (expires_key, paste_id) = key.value();
                if expires_key > now_key {
                    break;
                }
                due.push((expires_key, paste_id.to_string()));
            }

            let mut flipped = 0usize;
            for (expires_key, paste_id) in due {
                match load_paste(&pastes, &paste_id)? {
                    Some(mut paste) if !paste.is_deleted && is_expired(paste.expires_at, now) => {
                        mark_deleted(&mut pastes, &mut by_expiry, &mut paste)?;
                        flipped += 1;
                    }
                    // Sub-millisecond remainder: due on the next sweep.
                    Some(paste) if !paste.is_deleted => {}
                    // Stale entry for a missing or already-deleted row.
                    _ => {
                        let _ = by_expiry.remove((expires_key, paste_id.as_str()))?;
                    }
                }
            }
            flipped
        };
        write_txn.commit()?;
        Ok(flipped)
    }

    /// Count rows that are not soft-deleted.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn count_live(&self) -> Result<usize, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        let mut live = 0usize;
        for item in pastes.iter()? {
            let (_, value) = item?;
            if !deserialize_paste(value.value())?.is_deleted {
                live += 1;
            }
        }
        Ok(live)
    }
}

#[cfg(test)]
mod tests;
