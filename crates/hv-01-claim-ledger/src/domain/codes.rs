//! Verification code helpers.

use sha2::{Digest, Sha256};

/// Bytes of the SHA-256 digest kept in a fingerprint.
const FINGERPRINT_BYTES: usize = 6;

/// Short stable fingerprint of a code, safe to put in logs.
pub fn code_fingerprint(code: &str) -> String {
    let digest = Sha256::digest(code.as_bytes());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

/// Normalizes a scanned or typed code. Surrounding whitespace from manual
/// entry is dropped; case is significant.
pub fn normalize_code(raw: &str) -> &str {
    raw.trim()
}
