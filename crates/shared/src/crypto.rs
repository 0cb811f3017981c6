//! Cryptographic utilities for admin API key generation and hashing.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Prefix carried by every admin API key.
pub const API_KEY_PREFIX: &str = "dk_";

/// Number of random characters following the prefix in a generated key.
const API_KEY_RANDOM_LEN: usize = 32;

/// Length of the display prefix stored alongside the hash.
const DISPLAY_PREFIX_LEN: usize = 8;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Extracts the display prefix from an API key (first 8 characters after "dk_").
pub fn extract_key_prefix(key: &str) -> Option<&str> {
    let rest = key.strip_prefix(API_KEY_PREFIX)?;
    rest.get(..DISPLAY_PREFIX_LEN)
}

/// Returns true when the key has the expected shape (prefix + at least 8 chars).
pub fn is_well_formed_key(key: &str) -> bool {
    extract_key_prefix(key).is_some()
}

/// Generates a new random admin API key (`dk_` + 32 alphanumeric chars).
pub fn generate_api_key() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    let key: String = (0..API_KEY_RANDOM_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();

    format!("{}{}", API_KEY_PREFIX, key)
}
