//! Paste record stored in redb, request payloads, and the response views.
//!
//! Response views are explicit allow-list projections: audit fields, the
//! password hash, and the delete token never appear in any of them except the
//! token in [`CreatedPaste`], which is returned once to the creator.

use crate::constants::MAX_USER_AGENT_CHARS;
use crate::detection::Language;
use crate::ids;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical paste row (bincode-encoded in the `pastes` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paste {
    pub id: String,
    pub content: String,
    pub language: Language,
    /// Argon2id PHC string; `None` means the paste is public.
    pub password_hash: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Keyed hash of the submitter's network origin.
    pub requester_hash: String,
    pub user_agent: Option<String>,
    pub access_count: u64,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
    pub delete_token: String,
}

impl Paste {
    /// Create a live, public, never-expiring paste with fresh id and delete token.
    ///
    /// # Arguments
    /// - `content`: Paste body, stored verbatim.
    /// - `language`: Language tag for the body.
    /// - `now`: Creation instant.
    ///
    /// # Returns
    /// A new [`Paste`] with zeroed access counters and empty audit fields.
    pub fn new(content: String, language: Language, now: DateTime<Utc>) -> Self {
        Self {
            id: ids::new_id(),
            content,
            language,
            password_hash: None,
            expires_at: None,
            created_at: now,
            requester_hash: String::new(),
            user_agent: None,
            access_count: 0,
            last_accessed_at: None,
            is_deleted: false,
            delete_token: ids::new_delete_token(),
        }
    }

    /// Whether the record may still be served (not soft-deleted and not past expiry).
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_deleted && !crate::expiry::is_expired(self.expires_at, now)
    }
}

/// Network-level facts about the creator, captured for the audit trail only.
#[derive(Debug, Clone, Default)]
pub struct Submitter {
    /// Peer address as text, when the transport knows it.
    pub origin: Option<String>,
    pub user_agent: Option<String>,
}

/// Cut a user-agent header down to the stored maximum (in characters).
pub fn truncate_user_agent(raw: &str) -> String {
    raw.chars().take(MAX_USER_AGENT_CHARS).collect()
}

/// Request payload for creating a paste.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePasteRequest {
    pub content: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub expiration: Option<String>,
}

/// Request payload for unlocking a protected paste.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPasteRequest {
    pub password: String,
}

/// Request payload for deleting a paste.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePasteRequest {
    pub delete_token: String,
}

/// Request payload for the detection endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectLanguageRequest {
    pub content: String,
}

/// Detection endpoint response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedLanguage {
    pub language: Language,
}

/// Response returned once, to the creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPaste {
    pub id: String,
    pub delete_token: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&Paste> for CreatedPaste {
    fn from(value: &Paste) -> Self {
        Self {
            id: value.id.clone(),
            delete_token: value.delete_token.clone(),
            expires_at: value.expires_at,
        }
    }
}

/// Full view of a disclosed paste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockedPaste {
    pub id: String,
    pub content: String,
    pub language: Language,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub access_count: u64,
}

impl From<&Paste> for UnlockedPaste {
    fn from(value: &Paste) -> Self {
        Self {
            id: value.id.clone(),
            content: value.content.clone(),
            language: value.language,
            expires_at: value.expires_at,
            created_at: value.created_at,
            access_count: value.access_count,
        }
    }
}

/// Password challenge for a protected paste; never carries content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedPaste {
    pub id: String,
    pub language: Language,
    pub has_password: bool,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&Paste> for LockedPaste {
    fn from(value: &Paste) -> Self {
        Self {
            id: value.id.clone(),
            language: value.language,
            has_password: true,
            expires_at: value.expires_at,
        }
    }
}

/// Result of a read: content or a password challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PasteView {
    Unlocked(UnlockedPaste),
    Locked(LockedPaste),
}

impl PasteView {
    /// Paste id of either variant.
    pub fn id(&self) -> &str {
        match self {
            Self::Unlocked(view) => view.id.as_str(),
            Self::Locked(view) => view.id.as_str(),
        }
    }
}
