//! SHA-256 integrity checks for fetched policy text.

use regolint_core::errors::FetchError;
use sha2::{Digest, Sha256};

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Compare against an expected digest, optionally `sha256:`-prefixed.
/// Letter case is ignored.
pub fn verify_checksum(data: &[u8], expected: &str, url: &str) -> Result<(), FetchError> {
    let expected = expected.trim();
    let expected = expected.strip_prefix("sha256:").unwrap_or(expected);
    let actual = sha256_hex(data);

    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(FetchError::Integrity {
            url: url.to_string(),
            expected: expected.to_string(),
            actual,
        })
    }
}
