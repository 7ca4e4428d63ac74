//! Proof-of-Work nonce search.
//!
//! The search is a plain loop that hands control to a [`MiningObserver`]
//! every `progress_every` attempts. Callers that want a responsive UI run
//! it on a worker thread and read progress from the observer; callers that
//! don't care pass a closure that ignores the count.

use log::debug;
use serde::Serialize;

use super::PROGRESS_CADENCE;
use super::block::BlockTemplate;
use super::hash::meets_difficulty;
use crate::error::{LedgerError, Result};

/// Receives progress while a search is running.
pub trait MiningObserver {
    /// Called with the number of attempts made so far.
    fn on_progress(&mut self, attempts: u64);

    /// Polled at every progress point; returning `true` stops the search.
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<F: FnMut(u64)> MiningObserver for F {
    fn on_progress(&mut self, attempts: u64) {
        self(attempts)
    }
}

/// Winning `(hash, nonce)` pair, plus how many hashes it took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seal {
    pub hash: String,
    pub nonce: u64,
    pub attempts: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: u32,
    progress_every: u64,
    max_attempts: Option<u64>,
}

impl ProofOfWork {
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty,
            progress_every: PROGRESS_CADENCE,
            max_attempts: None,
        }
    }

    pub fn with_progress_every(mut self, attempts: u64) -> Self {
        self.progress_every = attempts.max(1);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u64>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Find the first nonce, counting up from 0, whose hash meets the
    /// difficulty. The result depends only on the template and difficulty.
    pub fn search<O>(&self, template: &BlockTemplate, observer: &mut O) -> Result<Seal>
    where
        O: MiningObserver + ?Sized,
    {
        let mut nonce: u64 = 0;
        loop {
            if let Some(max) = self.max_attempts {
                if nonce >= max {
                    debug!(
                        "POW - giving up on block #{} after {nonce} attempts",
                        template.index
                    );
                    return Err(LedgerError::MiningAborted { attempts: nonce });
                }
            }

            let hash = template.hash_with_nonce(nonce);
            let attempts = nonce + 1;
            if meets_difficulty(&hash, self.difficulty) {
                observer.on_progress(attempts);
                return Ok(Seal {
                    hash,
                    nonce,
                    attempts,
                });
            }

            if attempts % self.progress_every == 0 {
                observer.on_progress(attempts);
                if observer.is_cancelled() {
                    debug!(
                        "POW - cancelled on block #{} at {attempts} attempts",
                        template.index
                    );
                    return Err(LedgerError::MiningCancelled);
                }
            }
            nonce += 1;
        }
    }

    /// Check a seal produced elsewhere against `template`.
    pub fn verify(&self, template: &BlockTemplate, seal: &Seal) -> bool {
        meets_difficulty(&seal.hash, self.difficulty)
            && template.hash_with_nonce(seal.nonce) == seal.hash
    }
}
