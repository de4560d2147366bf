//! Shared constants used across SharePaste crates.

/// Default API port for SharePaste.
pub const DEFAULT_PORT: u16 = 38480;

/// Default maximum paste size (bytes) accepted by the API layer and core.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 1024 * 1024;

/// Default interval between background expiry sweeps, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60 * 60;

/// Length of generated paste identifiers.
pub const PASTE_ID_LEN: usize = 12;
/// Length of generated delete tokens.
pub const DELETE_TOKEN_LEN: usize = 32;
/// Longest identifier accepted from clients.
pub const MAX_ID_LEN: usize = 50;
/// Longest delete token accepted from clients.
pub const MAX_DELETE_TOKEN_LEN: usize = 64;
/// Longest password accepted, in characters.
pub const MAX_PASSWORD_CHARS: usize = 128;
/// Stored user-agent strings are cut to this many characters.
pub const MAX_USER_AGENT_CHARS: usize = 200;

/// Argon2id defaults (OWASP minimum profile for Argon2id).
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19 * 1024;
/// Argon2id pass count.
pub const DEFAULT_HASH_ITERATIONS: u32 = 2;
/// Argon2id lane count.
pub const DEFAULT_HASH_PARALLELISM: u32 = 1;
