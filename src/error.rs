use thiserror::Error;

/// Failures surfaced by the ledger engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("block data must not be empty")]
    EmptyData,

    #[error("chain is compromised; reset it before adding blocks")]
    ChainLocked,

    #[error("block index {index} out of range (chain length {len})")]
    IndexOutOfRange { index: u64, len: usize },

    #[error("difficulty cannot change once the chain has blocks")]
    DifficultyLocked,

    #[error("mining aborted after {attempts} attempts")]
    MiningAborted { attempts: u64 },

    #[error("mining cancelled")]
    MiningCancelled,

    #[error("chain tip moved while mining; template is stale")]
    StaleTemplate,

    #[error("seal does not match the block template or difficulty")]
    InvalidSeal,
}

pub type Result<T> = std::result::Result<T, LedgerError>;
