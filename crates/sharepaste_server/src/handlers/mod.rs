//! HTTP request handlers.

/// Health and language-detection endpoints.
pub mod meta;
/// Paste lifecycle endpoints.
pub mod paste;

use crate::{error::HttpError, AppError};

/// Run CPU-heavy domain work (password hashing) off the async runtime.
///
/// # Errors
/// Propagates the closure's error; a panicked or cancelled task becomes
/// [`AppError::Internal`].
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, HttpError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| {
            tracing::error!("Blocking task failed: {}", err);
            HttpError::from(AppError::Internal)
        })?
        .map_err(HttpError::from)
}
