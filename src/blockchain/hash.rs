use serde::Serialize;
use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Previous-hash of the first block: an all-zero digest.
pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// The fields covered by a block hash, in preimage order.
/// `hash`, `valid` and `tampered` are deliberately absent.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HashedFields<'a> {
    pub index: u64,
    pub timestamp: &'a str,
    pub data: &'a str,
    #[serde(rename = "previousHash")]
    pub previous_hash: &'a str,
    pub nonce: u64,
}

/// SHA-256 over the compact JSON encoding of `fields`, hex-encoded.
pub fn digest(fields: &HashedFields<'_>) -> String {
    let preimage = serde_json::to_vec(fields).expect("hashed fields serialize");
    let mut hasher = Sha256::new();
    hasher.update(&preimage);
    hex::encode(hasher.finalize())
}

/// Whether `hash` starts with `difficulty` hex zero characters.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let n = difficulty as usize;
    hash.len() >= n && hash.bytes().take(n).all(|b| b == b'0')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(data: &str) -> HashedFields<'_> {
        HashedFields {
            index: 1,
            timestamp: "2026-01-01T00:00:00.000Z",
            data,
            previous_hash: GENESIS_PREVIOUS_HASH,
            nonce: 7,
        }
    }

    #[test]
    fn digest_is_deterministic_and_fixed_length() {
        let a = digest(&fields("hello"));
        let b = digest(&fields("hello"));
        assert_eq!(a, b);
        assert_eq!(a.len(), DIGEST_HEX_LEN);
        assert!(a.bytes().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn whitespace_changes_digest() {
        assert_ne!(digest(&fields("hello")), digest(&fields("hello ")));
    }

    #[test]
    fn every_field_is_covered() {
        let base = fields("x");
        let h = digest(&base);
        assert_ne!(h, digest(&HashedFields { index: 2, ..base }));
        assert_ne!(h, digest(&HashedFields { nonce: 8, ..base }));
        assert_ne!(
            h,
            digest(&HashedFields {
                timestamp: "2026-01-01T00:00:00.001Z",
                ..base
            })
        );
        let other_prev = "1".repeat(DIGEST_HEX_LEN);
        assert_ne!(
            h,
            digest(&HashedFields {
                previous_hash: &other_prev,
                ..base
            })
        );
    }

    #[test]
    fn sentinel_matches_digest_length() {
        assert_eq!(GENESIS_PREVIOUS_HASH.len(), DIGEST_HEX_LEN);
        assert!(GENESIS_PREVIOUS_HASH.bytes().all(|b| b == b'0'));
    }

    #[test]
    fn difficulty_predicate() {
        assert!(meets_difficulty("00ab", 2));
        assert!(!meets_difficulty("0a0b", 2));
        assert!(meets_difficulty("abc", 0));
        assert!(!meets_difficulty("0", 2));
    }
}
