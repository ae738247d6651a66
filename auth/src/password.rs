//! Salted password hashing.
//!
//! Uses argon2 with a random 16-byte salt. Hashing and verification are
//! CPU-bound, so the async entry points run them under
//! `tokio::task::spawn_blocking` to keep the request scheduler free.
//! Plaintext passwords are never stored or logged.

use campus_events_core::{Error, Result};
use rand::RngCore;
use std::sync::LazyLock;

/// Encoded hash of a throwaway password, verified on the unknown-email
/// path of authentication so that path costs about the same as a real
/// verification (account enumeration resistance).
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash("correct horse battery staple").unwrap_or_default());

/// Hash a plaintext password with a fresh random salt.
///
/// # Errors
///
/// Returns `Error::Internal` if the hash function fails.
pub fn hash(plain: &str) -> Result<String> {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    argon2::hash_encoded(plain.as_bytes(), &salt, &argon2::Config::default())
        .map_err(|_| Error::Internal)
}

/// Verify a plaintext password against an encoded hash.
///
/// Any decoding failure counts as a mismatch.
#[must_use]
pub fn verify(encoded: &str, plain: &str) -> bool {
    argon2::verify_encoded(encoded, plain.as_bytes()).unwrap_or(false)
}

/// Hash a password on a blocking thread.
///
/// # Errors
///
/// Returns `Error::Internal` if the blocking task is cancelled or the
/// hash function fails.
pub async fn hash_blocking(plain: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash(&plain))
        .await
        .map_err(|_| Error::Internal)?
}

/// Verify a password on a blocking thread.
///
/// # Errors
///
/// Returns `Error::Internal` if the blocking task is cancelled.
pub async fn verify_blocking(encoded: String, plain: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify(&encoded, &plain))
        .await
        .map_err(|_| Error::Internal)
}

/// Burn roughly one verification's worth of CPU without revealing
/// whether an account exists.
pub async fn verify_dummy_blocking(plain: String) {
    let _ = verify_blocking(DUMMY_HASH.clone(), plain).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let encoded = hash("hunter2").unwrap_or_default();
        assert!(verify(&encoded, "hunter2"));
        assert!(!verify(&encoded, "hunter3"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash("hunter2").unwrap_or_default();
        let b = hash("hunter2").unwrap_or_default();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_tolerates_garbage_hashes() {
        assert!(!verify("not-an-encoded-hash", "hunter2"));
    }

    #[tokio::test]
    async fn blocking_wrappers_round_trip() {
        let encoded = hash_blocking("hunter2".to_string()).await.unwrap_or_default();
        let ok = verify_blocking(encoded, "hunter2".to_string()).await;
        assert_eq!(ok, Ok(true));
    }
}
