//! Password hashing for stored credentials.
//!
//! Hashes are stored as `pbkdf2:{iterations}:{hex_salt}:{hex_hash}` so the
//! cost factor can be raised later without invalidating existing rows.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

const ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut hash = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, ITERATIONS, &mut hash);

    format!(
        "pbkdf2:{}:{}:{}",
        ITERATIONS,
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// Check a candidate password against a stored hash. Unparseable hashes
/// fail verification rather than erroring.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split(':');
    let (Some("pbkdf2"), Some(iterations), Some(salt_hex), Some(hash_hex), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(hash_hex)) else {
        return false;
    };
    if salt.is_empty() || expected.is_empty() {
        return false;
    }

    let mut candidate = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut candidate);

    constant_time_eq(&candidate, &expected)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
