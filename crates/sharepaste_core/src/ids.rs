//! Random paste identifiers and delete tokens.
//!
//! Both are uniform draws from a 64-symbol URL-safe alphabet using the OS
//! CSPRNG, so each character carries 6 bits of entropy (72 bits per id,
//! 192 bits per delete token). Collisions are not retried.

use crate::constants::{DELETE_TOKEN_LEN, MAX_ID_LEN, PASTE_ID_LEN};
use rand::{rngs::OsRng, Rng};

const URL_SAFE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

fn random_string(len: usize) -> String {
    let mut rng = OsRng;
    (0..len)
        .map(|_| char::from(URL_SAFE_ALPHABET[rng.gen_range(0..URL_SAFE_ALPHABET.len())]))
        .collect()
}

/// Generate a new public paste identifier.
pub fn new_id() -> String {
    random_string(PASTE_ID_LEN)
}

/// Generate a new secret delete token.
pub fn new_delete_token() -> String {
    random_string(DELETE_TOKEN_LEN)
}

fn is_url_safe(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Check a client-supplied identifier against `^[A-Za-z0-9_-]{1,50}$`.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_ID_LEN && is_url_safe(id)
}
