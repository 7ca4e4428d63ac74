pub mod block;
pub mod events;
pub mod hash;
pub mod model;
pub mod pow;
pub mod tamper;
pub mod validator;

pub use block::{Block, BlockTemplate};
pub use events::{LedgerEvent, MiningStatus};
pub use model::{Ledger, MiningPolicy};
pub use pow::{MiningObserver, ProofOfWork, Seal};
pub use tamper::{TamperReport, TamperSimulator};
pub use validator::{ChainValidator, Defect, DefectKind, ValidationReport};

/// Default Proof-of-Work difficulty (number of leading hex zeros).
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// Difficulty bounds accepted from callers.
pub const DIFF_MIN: u32 = 1;
pub const DIFF_MAX: u32 = 5;

/// Attempts between two progress reports while mining.
pub const PROGRESS_CADENCE: u64 = 100;

/// Clamp a requested difficulty into `[DIFF_MIN, DIFF_MAX]`.
pub fn clamp_difficulty(difficulty: u32) -> u32 {
    difficulty.clamp(DIFF_MIN, DIFF_MAX)
}

/// Clamp raw user input, negatives included, into `[DIFF_MIN, DIFF_MAX]`.
pub fn clamp_difficulty_input(raw: i64) -> u32 {
    raw.clamp(i64::from(DIFF_MIN), i64::from(DIFF_MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_difficulty_input_is_clamped() {
        assert_eq!(clamp_difficulty_input(-3), DIFF_MIN);
        assert_eq!(clamp_difficulty_input(0), DIFF_MIN);
        assert_eq!(clamp_difficulty_input(3), 3);
        assert_eq!(clamp_difficulty_input(i64::MAX), DIFF_MAX);
    }
}
