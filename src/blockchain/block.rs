use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::hash::{self, HashedFields};
use super::pow::Seal;

/// A single mined block in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: String, // RFC 3339, UTC, millisecond precision
    pub data: String,
    pub previous_hash: String,
    pub hash: String, // Hash found by Proof-of-Work
    pub nonce: u64,
    pub valid: bool,
    pub tampered: bool,
}

impl Block {
    pub fn hashed_fields(&self) -> HashedFields<'_> {
        HashedFields {
            index: self.index,
            timestamp: &self.timestamp,
            data: &self.data,
            previous_hash: &self.previous_hash,
            nonce: self.nonce,
        }
    }

    /// Recompute the hash from the current contents (ignores the stored `hash`).
    pub fn compute_hash(&self) -> String {
        hash::digest(&self.hashed_fields())
    }
}

/// The fields of a block fixed before the nonce search starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTemplate {
    pub index: u64,
    pub timestamp: String,
    pub data: String,
    pub previous_hash: String,
}

impl BlockTemplate {
    /// Build a template stamped with the current time.
    pub fn new(index: u64, data: String, previous_hash: String) -> Self {
        Self::new_with_timestamp(index, data, previous_hash, now_timestamp())
    }

    pub fn new_with_timestamp(
        index: u64,
        data: String,
        previous_hash: String,
        timestamp: String,
    ) -> Self {
        Self {
            index,
            timestamp,
            data,
            previous_hash,
        }
    }

    pub fn hash_with_nonce(&self, nonce: u64) -> String {
        hash::digest(&HashedFields {
            index: self.index,
            timestamp: &self.timestamp,
            data: &self.data,
            previous_hash: &self.previous_hash,
            nonce,
        })
    }

    /// Turn the template into a fresh block carrying `seal`.
    pub fn into_block(self, seal: Seal) -> Block {
        Block {
            index: self.index,
            timestamp: self.timestamp,
            data: self.data,
            previous_hash: self.previous_hash,
            hash: seal.hash,
            nonce: seal.nonce,
            valid: true,
            tampered: false,
        }
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
