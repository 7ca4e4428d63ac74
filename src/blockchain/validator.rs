use std::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::Ledger;
use super::hash::{GENESIS_PREVIOUS_HASH, meets_difficulty};

/// Why a block failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectKind {
    /// Stored hash does not match the recomputed one.
    HashMismatch,
    /// Stored hash lacks the required leading zeros.
    ProofOfWorkInvalid,
    /// Previous-hash differs from the predecessor's stored hash or from the
    /// digest of its current contents (the sentinel for the first block).
    LinkBroken,
}

impl fmt::Display for DefectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DefectKind::HashMismatch => "hash mismatch",
            DefectKind::ProofOfWorkInvalid => "proof-of-work invalid",
            DefectKind::LinkBroken => "link broken",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defect {
    pub index: u64,
    pub kind: DefectKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub defects: Vec<Defect>,
}

impl ValidationReport {
    /// Defects found on block `index`, in check order.
    pub fn defects_for(&self, index: u64) -> Vec<DefectKind> {
        self.defects
            .iter()
            .filter(|d| d.index == index)
            .map(|d| d.kind)
            .collect()
    }

    /// One line, e.g. `Block 1: hash mismatch | Block 2: link broken`.
    pub fn summary(&self) -> String {
        self.defects
            .iter()
            .map(|d| format!("Block {}: {}", d.index, d.kind))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Recomputes every block and cross-checks hashes, difficulty and linkage.
pub struct ChainValidator;

impl ChainValidator {
    /// Check the whole chain without touching it.
    ///
    /// All three checks run for every block; a failing block does not hide
    /// failures on the same block or later ones. A link must match both the
    /// predecessor's stored hash and the digest of its current contents, so
    /// an edited block also breaks the link into its successor. An empty
    /// chain is valid.
    pub fn inspect(ledger: &Ledger) -> ValidationReport {
        let difficulty = ledger.difficulty();
        let mut defects = Vec::new();
        let mut prev: Option<(&str, String)> = None; // (stored hash, recomputed hash)

        for (i, block) in ledger.blocks().iter().enumerate() {
            let index = i as u64;
            let recomputed = block.compute_hash();

            if recomputed != block.hash {
                defects.push(Defect {
                    index,
                    kind: DefectKind::HashMismatch,
                });
            }

            if !meets_difficulty(&block.hash, difficulty) {
                defects.push(Defect {
                    index,
                    kind: DefectKind::ProofOfWorkInvalid,
                });
            }

            let linked = match &prev {
                None => block.previous_hash == GENESIS_PREVIOUS_HASH,
                Some((stored, actual)) => {
                    block.previous_hash == *stored && block.previous_hash == *actual
                }
            };
            if !linked {
                defects.push(Defect {
                    index,
                    kind: DefectKind::LinkBroken,
                });
            }

            prev = Some((block.hash.as_str(), recomputed));
        }

        ValidationReport {
            is_valid: defects.is_empty(),
            defects,
        }
    }

    /// Check the chain and record the verdict on the ledger, which gates
    /// further appends.
    pub fn validate(ledger: &mut Ledger) -> ValidationReport {
        let report = Self::inspect(ledger);
        ledger.set_chain_valid(report.is_valid);
        if report.is_valid {
            info!("chain valid ({} blocks)", ledger.len());
        } else {
            warn!("ATTACK DETECTED - {}", report.summary());
        }
        report
    }
}
