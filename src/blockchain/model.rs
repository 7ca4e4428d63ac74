use log::{debug, info, warn};

use super::hash::GENESIS_PREVIOUS_HASH;
use super::{Block, BlockTemplate, MiningObserver, PROGRESS_CADENCE, ProofOfWork, Seal};
use super::{DEFAULT_DIFFICULTY, clamp_difficulty};
use crate::error::{LedgerError, Result};

/// Knobs for the nonce search, independent of difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningPolicy {
    pub progress_every: u64,
    pub max_attempts: Option<u64>,
}

impl Default for MiningPolicy {
    fn default() -> Self {
        Self {
            progress_every: PROGRESS_CADENCE,
            max_attempts: None,
        }
    }
}

/// In-memory, single-writer hash chain secured by Proof-of-Work.
///
/// Only `mine_and_append`/`commit_block`, the tamper simulator and the
/// validator mutate it; everything else reads through accessors.
#[derive(Debug, Clone)]
pub struct Ledger {
    blocks: Vec<Block>,
    difficulty: u32,
    chain_valid: bool,
    policy: MiningPolicy,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

impl Ledger {
    /// Create an empty ledger. `difficulty` is clamped to `[1, 5]`.
    pub fn new(difficulty: u32) -> Self {
        Self::with_policy(difficulty, MiningPolicy::default())
    }

    pub fn with_policy(difficulty: u32, policy: MiningPolicy) -> Self {
        Self {
            blocks: Vec::new(),
            difficulty: clamp_difficulty(difficulty),
            chain_valid: true,
            policy,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn last_block(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Last verdict from validation or tampering.
    pub fn chain_valid(&self) -> bool {
        self.chain_valid
    }

    pub fn policy(&self) -> MiningPolicy {
        self.policy
    }

    /// Change the difficulty for the next chain. Clamped to `[1, 5]`;
    /// refused once the first block has been mined.
    pub fn set_difficulty(&mut self, difficulty: u32) -> Result<u32> {
        if !self.blocks.is_empty() {
            return Err(LedgerError::DifficultyLocked);
        }
        self.difficulty = clamp_difficulty(difficulty);
        Ok(self.difficulty)
    }

    /// Proof-of-Work configured for this ledger.
    pub fn proof_of_work(&self) -> ProofOfWork {
        ProofOfWork::new(self.difficulty)
            .with_progress_every(self.policy.progress_every)
            .with_max_attempts(self.policy.max_attempts)
    }

    /// Mine `data` into a new block and append it.
    ///
    /// Holding `&mut self` for the whole search keeps the tip read and the
    /// append atomic. An aborted or cancelled search appends nothing.
    pub fn mine_and_append<O>(&mut self, data: &str, observer: &mut O) -> Result<&Block>
    where
        O: MiningObserver + ?Sized,
    {
        let template = self.prepare_block(data)?;
        let seal = self.proof_of_work().search(&template, observer)?;
        self.commit_block(template, seal)
    }

    /// Snapshot index, timestamp and previous hash for a block carrying `data`.
    pub fn prepare_block(&self, data: &str) -> Result<BlockTemplate> {
        if data.trim().is_empty() {
            return Err(LedgerError::EmptyData);
        }
        self.ensure_unlocked()?;

        let index = self.blocks.len() as u64;
        let previous_hash = match self.blocks.last() {
            Some(prev) => prev.hash.clone(),
            None => GENESIS_PREVIOUS_HASH.to_string(),
        };
        let template = BlockTemplate::new(index, data.to_string(), previous_hash);
        debug!(
            "TEMPLATE height={} prev={} diff={}",
            template.index, template.previous_hash, self.difficulty
        );
        Ok(template)
    }

    /// Append a block mined from `template`, provided the chain has not
    /// moved or been compromised since the template was prepared.
    pub fn commit_block(&mut self, template: BlockTemplate, seal: Seal) -> Result<&Block> {
        self.ensure_unlocked()?;

        let tip_hash = self
            .blocks
            .last()
            .map_or(GENESIS_PREVIOUS_HASH, |b| b.hash.as_str());
        if template.index != self.blocks.len() as u64 || template.previous_hash != tip_hash {
            warn!("stale template for block #{}: head moved", template.index);
            return Err(LedgerError::StaleTemplate);
        }
        if !self.proof_of_work().verify(&template, &seal) {
            warn!("rejected seal for block #{} (nonce={})", template.index, seal.nonce);
            return Err(LedgerError::InvalidSeal);
        }

        info!(
            "MINER - sealed block #{} (hash={}, nonce={}, attempts={})",
            template.index, seal.hash, seal.nonce, seal.attempts
        );
        self.blocks.push(template.into_block(seal));
        Ok(&self.blocks[self.blocks.len() - 1])
    }

    /// Drop every block and clear the compromised state. Difficulty is kept.
    pub fn reset(&mut self) {
        info!("chain reset ({} blocks dropped)", self.blocks.len());
        self.blocks.clear();
        self.chain_valid = true;
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if !self.blocks.is_empty() && !self.chain_valid {
            warn!("append refused: chain is compromised");
            return Err(LedgerError::ChainLocked);
        }
        Ok(())
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    pub(crate) fn set_chain_valid(&mut self, valid: bool) {
        self.chain_valid = valid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::hash::meets_difficulty;

    fn mine(ledger: &mut Ledger, data: &str) -> Block {
        ledger
            .mine_and_append(data, &mut |_: u64| {})
            .expect("mine")
            .clone()
    }

    #[test]
    fn first_block_links_to_sentinel() {
        let mut ledger = Ledger::new(2);
        let b = mine(&mut ledger, "genesis");
        assert_eq!(b.index, 0);
        assert_eq!(b.previous_hash, GENESIS_PREVIOUS_HASH);
        assert!(meets_difficulty(&b.hash, 2));
        assert_eq!(b.compute_hash(), b.hash);
        assert!(b.valid && !b.tampered);
    }

    #[test]
    fn blocks_link_to_predecessor() {
        let mut ledger = Ledger::new(1);
        for data in ["a", "b", "c"] {
            mine(&mut ledger, data);
        }
        assert_eq!(ledger.len(), 3);
        for (i, pair) in ledger.blocks().windows(2).enumerate() {
            assert_eq!(pair[1].previous_hash, pair[0].hash);
            assert_eq!(pair[1].index, i as u64 + 1);
        }
        assert_eq!(ledger.last_block().map(|b| b.data.as_str()), Some("c"));
    }

    #[test]
    fn empty_or_blank_data_is_rejected() {
        let mut ledger = Ledger::new(1);
        for data in ["", "   ", "\t\n"] {
            let err = ledger.mine_and_append(data, &mut |_: u64| {}).unwrap_err();
            assert_eq!(err, LedgerError::EmptyData);
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn difficulty_is_clamped_and_locked() {
        let mut ledger = Ledger::new(9);
        assert_eq!(ledger.difficulty(), 5);
        assert_eq!(ledger.set_difficulty(0), Ok(1));
        assert_eq!(ledger.set_difficulty(3), Ok(3));

        mine(&mut ledger, "x");
        assert_eq!(ledger.set_difficulty(1), Err(LedgerError::DifficultyLocked));
        assert_eq!(ledger.difficulty(), 3);

        ledger.reset();
        assert_eq!(ledger.difficulty(), 3);
        assert_eq!(ledger.set_difficulty(2), Ok(2));
    }

    #[test]
    fn progress_is_reported_while_mining() {
        let policy = MiningPolicy {
            progress_every: 1,
            max_attempts: None,
        };
        let mut ledger = Ledger::with_policy(2, policy);
        let mut seen = Vec::new();
        let block = ledger
            .mine_and_append("progress", &mut |n: u64| seen.push(n))
            .expect("mine")
            .clone();
        assert_eq!(seen.last().copied(), Some(block.nonce + 1));
    }

    #[test]
    fn aborted_search_leaves_ledger_untouched() {
        let policy = MiningPolicy {
            progress_every: 100,
            max_attempts: Some(1),
        };
        let mut ledger = Ledger::with_policy(5, policy);
        let err = ledger
            .mine_and_append("unlikely", &mut |_: u64| {})
            .unwrap_err();
        assert_eq!(err, LedgerError::MiningAborted { attempts: 1 });
        assert!(ledger.is_empty());
    }

    #[test]
    fn stale_template_is_rejected() {
        let mut ledger = Ledger::new(1);
        let template = ledger.prepare_block("late").expect("template");
        let seal = ledger
            .proof_of_work()
            .search(&template, &mut |_: u64| {})
            .expect("search");

        mine(&mut ledger, "first");
        assert_eq!(
            ledger.commit_block(template, seal),
            Err(LedgerError::StaleTemplate)
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn forged_seal_is_rejected() {
        let mut ledger = Ledger::new(1);
        let template = ledger.prepare_block("forged").expect("template");
        let seal = Seal {
            hash: GENESIS_PREVIOUS_HASH.to_string(),
            nonce: 0,
            attempts: 1,
        };
        assert_eq!(
            ledger.commit_block(template, seal),
            Err(LedgerError::InvalidSeal)
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn reset_clears_chain_and_lock() {
        let mut ledger = Ledger::new(1);
        mine(&mut ledger, "a");
        ledger.set_chain_valid(false);
        assert_eq!(
            ledger.prepare_block("b").unwrap_err(),
            LedgerError::ChainLocked
        );

        ledger.reset();
        assert!(ledger.is_empty());
        assert!(ledger.chain_valid());
        mine(&mut ledger, "b");
        assert_eq!(ledger.len(), 1);
    }
}
