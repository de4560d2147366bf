//! Background soft-delete of expired pastes.
//!
//! Reads already expire pastes lazily; the sweeper catches the ones nobody
//! reads again so they stop counting as live.

use crate::{paste_ops, Database};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawn the periodic expiry sweep on the current runtime.
///
/// # Arguments
/// - `db`: Shared database handle.
/// - `interval_secs`: Seconds between sweeps; `0` disables the sweeper.
///
/// # Returns
/// The task handle, or `None` when disabled. Abort the handle to stop it.
pub fn spawn_expiry_sweeper(db: Arc<Database>, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        tracing::info!("Expiry sweeper disabled");
        return None;
    }

    tracing::info!("Expiry sweeper running every {}s", interval_secs);
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(err) = sweep_once(db.clone()).await {
                tracing::error!("Expiry sweep failed: {}", err);
            }
        }
    }))
}

/// Run one sweep on the blocking pool.
///
/// # Returns
/// Number of pastes soft-deleted.
///
/// # Errors
/// Propagates storage errors; a panicked sweep becomes [`crate::AppError::Internal`].
pub async fn sweep_once(db: Arc<Database>) -> Result<usize, crate::AppError> {
    tokio::task::spawn_blocking(move || paste_ops::sweep_expired(&db, Utc::now()))
        .await
        .map_err(|err| {
            tracing::error!("Expiry sweep task panicked: {}", err);
            crate::AppError::Internal
        })?
}
