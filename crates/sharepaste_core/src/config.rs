//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_HASH_ITERATIONS, DEFAULT_HASH_MEMORY_KIB, DEFAULT_HASH_PARALLELISM,
    DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT, DEFAULT_SWEEP_INTERVAL_SECS,
};
use crate::credentials::HashCost;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Runtime configuration for SharePaste.
#[derive(Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_paste_size: usize,
    /// Seconds between background expiry sweeps; `0` disables the sweeper.
    pub sweep_interval_secs: u64,
    pub hash_cost: HashCost,
    /// Key material for requester hashing. `None` means a per-process random key.
    pub origin_secret: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_path", &self.db_path)
            .field("port", &self.port)
            .field("max_paste_size", &self.max_paste_size)
            .field("sweep_interval_secs", &self.sweep_interval_secs)
            .field("hash_cost", &self.hash_cost)
            .field(
                "origin_secret",
                &self.origin_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
///
/// # Arguments
/// - `name`: Environment variable name.
///
/// # Returns
/// `true` when the value is a recognized truthy value.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn env_parsed<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring unparseable {}='{}'; using default", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or fail to parse.
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("DB_PATH").map(expand_tilde).unwrap_or_else(|_| {
                let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
                let cache_dir = home.join(".cache").join("sharepaste");
                cache_dir.join("db").to_string_lossy().to_string()
            }),
            port: env_parsed("PORT", DEFAULT_PORT),
            max_paste_size: env_parsed("MAX_PASTE_SIZE", DEFAULT_MAX_PASTE_SIZE),
            sweep_interval_secs: env_parsed("SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS),
            hash_cost: HashCost {
                memory_kib: env_parsed("HASH_MEMORY_KIB", DEFAULT_HASH_MEMORY_KIB),
                iterations: env_parsed("HASH_ITERATIONS", DEFAULT_HASH_ITERATIONS),
                parallelism: env_parsed("HASH_PARALLELISM", DEFAULT_HASH_PARALLELISM),
            },
            origin_secret: env::var("ORIGIN_SECRET")
                .ok()
                .filter(|secret| !secret.trim().is_empty()),
        }
    }
}
