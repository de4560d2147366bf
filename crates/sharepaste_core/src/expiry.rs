//! Expiration choices and lazy-expiry checks.

use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;

/// Lifetime a submitter may pick for a paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirySelection {
    Never,
    TenMinutes,
    OneHour,
    OneDay,
    OneWeek,
    /// Fixed 30 days, not a calendar month.
    OneMonth,
    /// Fixed 365 days.
    OneYear,
}

impl ExpirySelection {
    /// Every accepted selection, in wire-tag order.
    pub const ALL: [ExpirySelection; 7] = [
        Self::Never,
        Self::TenMinutes,
        Self::OneHour,
        Self::OneDay,
        Self::OneWeek,
        Self::OneMonth,
        Self::OneYear,
    ];

    /// Wire tag used by clients.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::TenMinutes => "10min",
            Self::OneHour => "1hour",
            Self::OneDay => "1day",
            Self::OneWeek => "1week",
            Self::OneMonth => "1month",
            Self::OneYear => "1year",
        }
    }

    /// Lifetime of the selection, `None` for [`ExpirySelection::Never`].
    pub fn duration(self) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::TenMinutes => Some(Duration::minutes(10)),
            Self::OneHour => Some(Duration::hours(1)),
            Self::OneDay => Some(Duration::days(1)),
            Self::OneWeek => Some(Duration::weeks(1)),
            Self::OneMonth => Some(Duration::days(30)),
            Self::OneYear => Some(Duration::days(365)),
        }
    }

    /// Parse an optional client choice; a missing choice means never.
    ///
    /// # Errors
    /// Returns [`AppError::InvalidInput`] for unknown tags.
    pub fn from_request(value: Option<&str>) -> Result<Self, AppError> {
        match value {
            None => Ok(Self::Never),
            Some(raw) => raw.parse(),
        }
    }
}

impl FromStr for ExpirySelection {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|selection| selection.as_str() == value)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown expiration '{}'", value)))
    }
}

impl fmt::Display for ExpirySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the absolute expiry instant for a selection made at `now`.
///
/// # Returns
/// `None` for pastes that never expire, otherwise an instant strictly after `now`.
pub fn resolve_expiry(selection: ExpirySelection, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    selection.duration().map(|lifetime| now + lifetime)
}

/// Whether a paste with `expires_at` is past its lifetime at `now`.
///
/// The boundary instant itself counts as expired.
pub fn is_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_some_and(|deadline| now >= deadline)
}
