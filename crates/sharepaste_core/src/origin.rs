//! Keyed hashing of requester network origins for the audit trail.

use rand::{rngs::OsRng, RngCore};

const ORIGIN_KEY_CONTEXT: &str = "sharepaste 2024-06 requester origin hash";

/// Turns a requester address into a stable, non-reversible audit token.
///
/// The key is derived from a dedicated origin secret and never shares material
/// with identifier or delete-token generation.
#[derive(Clone)]
pub struct OriginHasher {
    key: [u8; 32],
}

impl OriginHasher {
    /// Derive the hashing key from a configured secret.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            key: blake3::derive_key(ORIGIN_KEY_CONTEXT, secret.as_bytes()),
        }
    }

    /// Use a random key that lives only as long as the process.
    ///
    /// Hashes for the same origin will differ across restarts.
    pub fn ephemeral() -> Self {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    /// Build from an optional configured secret, falling back to an ephemeral key.
    pub fn from_config(secret: Option<&str>) -> Self {
        match secret {
            Some(secret) => Self::from_secret(secret),
            None => {
                tracing::warn!(
                    "ORIGIN_SECRET is not set; requester hashes will not be stable across restarts"
                );
                Self::ephemeral()
            }
        }
    }

    /// Hash a requester origin (usually the peer IP address).
    ///
    /// # Returns
    /// Lowercase hex digest (64 chars).
    pub fn hash(&self, origin: &str) -> String {
        blake3::keyed_hash(&self.key, origin.as_bytes())
            .to_hex()
            .to_string()
    }
}
