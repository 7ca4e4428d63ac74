use log::warn;
use serde::Serialize;

use super::Ledger;
use crate::error::{LedgerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TamperReport {
    pub index: u64,
    /// The edited block plus every block after it.
    pub compromised: usize,
}

/// Simulates an attacker rewriting a block's payload in place.
pub struct TamperSimulator;

impl TamperSimulator {
    /// Replace the data of block `index` and mark it and every later block
    /// compromised. Hashes, nonces and links are left as mined, so the next
    /// validation reports the edit. The chain is locked immediately.
    pub fn tamper(ledger: &mut Ledger, index: u64, new_data: &str) -> Result<TamperReport> {
        let len = ledger.len();
        let pos = usize::try_from(index)
            .ok()
            .filter(|&pos| pos < len)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;

        let blocks = ledger.blocks_mut();
        blocks[pos].data = new_data.to_string();
        for block in &mut blocks[pos..] {
            block.tampered = true;
            block.valid = false;
        }
        ledger.set_chain_valid(false);

        let report = TamperReport {
            index,
            compromised: len - pos,
        };
        warn!(
            "ATTACK SIMULATED on block #{index}: {} block(s) compromised",
            report.compromised
        );
        Ok(report)
    }
}
