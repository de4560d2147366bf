//! Persistence records, request payloads, and client-facing views.

/// Paste record, request payloads, and allow-listed response views.
pub mod paste;
