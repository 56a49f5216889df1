//! SHA-256 content digest for chain blocks.
//!
//! The digest input is the plain concatenation of the block fields in a fixed
//! order. Absent ticket fields contribute the empty string, so a block without
//! ticket metadata and one whose ticket fields are all empty hash identically.

use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// Hex SHA-256 of `"abc"` (FIPS 180-2, appendix B.1).
const ABC_VECTOR: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

/// Borrowed view of every field that participates in a block digest.
#[derive(Debug, Clone, Copy)]
pub struct DigestInput<'a> {
    pub index: u64,
    pub timestamp: &'a str,
    pub data: &'a str,
    pub previous_hash: &'a str,
    pub event_id: Option<&'a str>,
    pub artist: Option<&'a str>,
    pub status: Option<&'a str>,
    pub owner: Option<&'a str>,
    pub nonce: u64,
}

/// Compute the lowercase hex SHA-256 digest of a block's fields.
pub fn compute_digest(input: &DigestInput<'_>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!(
        "{}{}{}{}{}{}{}{}{}",
        input.index,
        input.timestamp,
        input.data,
        input.previous_hash,
        input.event_id.unwrap_or(""),
        input.artist.unwrap_or(""),
        input.status.unwrap_or(""),
        input.owner.unwrap_or(""),
        input.nonce
    ));
    hex::encode(hasher.finalize())
}

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Number of leading `'0'` characters in a hex digest.
pub fn leading_zeros(hash: &str) -> usize {
    hash.chars().take_while(|c| *c == '0').count()
}

/// Whether `hash` starts with at least `difficulty` zero characters.
pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    leading_zeros(hash) >= difficulty
}

/// Check the hash primitive against a known vector.
///
/// Called once at startup. A failure means the build is broken and the
/// process must not start appending blocks.
pub fn self_test() -> Result<(), CoreError> {
    let mut hasher = Sha256::new();
    hasher.update(b"abc");
    let got = hex::encode(hasher.finalize());
    if got != ABC_VECTOR {
        log::error!("SHA-256 self test failed: got {}", got);
        return Err(CoreError::DigestUnavailable);
    }
    Ok(())
}
