/// Bearer token generation and hashing
///
/// Token values are 16 cryptographically random bytes, base64 encoded
/// (24 characters). Only the SHA-256 hex digest of the value is persisted;
/// lookups hash the presented value and search by digest.
///
/// # Example
///
/// ```
/// use til_shared::auth::token::{generate_token, hash_token, validate_token_format};
///
/// let (value, hash) = generate_token();
/// assert_eq!(value.len(), 24);
/// assert!(validate_token_format(&value));
/// assert_eq!(hash, hash_token(&value));
/// ```

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes in a token value
const TOKEN_BYTES: usize = 16;

/// Length of the base64-encoded token value
pub const TOKEN_LENGTH: usize = 24;

/// Generates a new bearer token
///
/// # Returns
///
/// Tuple of (plaintext_value, sha256_hex_hash)
pub fn generate_token() -> (String, String) {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);

    let value = STANDARD.encode(bytes);
    let hash = hash_token(&value);

    (value, hash)
}

/// Hashes a token value using SHA-256
///
/// Returns the hex-encoded digest (64 characters).
pub fn hash_token(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks that a presented value could have been issued by [`generate_token`]
///
/// Cheap pre-check before touching the store.
pub fn validate_token_format(value: &str) -> bool {
    if value.len() != TOKEN_LENGTH {
        return false;
    }

    matches!(STANDARD.decode(value), Ok(bytes) if bytes.len() == TOKEN_BYTES)
}

/// Verifies a token value against a stored hash in constant time
pub fn verify_token(value: &str, stored_hash: &str) -> bool {
    constant_time_compare(&hash_token(value), stored_hash)
}

/// Constant-time string comparison
///
/// Compares every byte regardless of where the strings first differ.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.as_bytes()
        .iter()
        .zip(b.as_bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
