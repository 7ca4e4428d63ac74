use std::fmt;

use serde::Serialize;

use super::ValidationReport;

/// Mining lifecycle as seen by an observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MiningStatus {
    pub mining: bool,
    pub progress: u64,
}

impl MiningStatus {
    pub fn started() -> Self {
        Self {
            mining: true,
            progress: 0,
        }
    }

    pub fn idle() -> Self {
        Self::default()
    }
}

/// Outcomes worth telling the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    MiningStarted,
    BlockMined { index: u64 },
    ChainValidated { report: ValidationReport },
    TamperSimulated { compromised: usize },
    ChainReset,
    ChainLocked,
    EmptyData,
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerEvent::MiningStarted => write!(f, "Mining in progress..."),
            LedgerEvent::BlockMined { index } => write!(f, "Block {index} mined successfully"),
            LedgerEvent::ChainValidated { report } if report.is_valid => {
                write!(f, "Chain valid and secure")
            }
            LedgerEvent::ChainValidated { report } => {
                write!(f, "ATTACK DETECTED\n{}", report.summary())
            }
            LedgerEvent::TamperSimulated { compromised } => {
                write!(f, "ATTACK SIMULATED\n{compromised} block(s) compromised")
            }
            LedgerEvent::ChainReset => write!(f, "Chain reset"),
            LedgerEvent::ChainLocked => write!(
                f,
                "CHAIN COMPROMISED\n\nCannot add a block. The chain was attacked and is invalid."
            ),
            LedgerEvent::EmptyData => write!(f, "Enter data for the block"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{Defect, DefectKind};

    #[test]
    fn messages_carry_outcome_details() {
        assert_eq!(
            LedgerEvent::BlockMined { index: 3 }.to_string(),
            "Block 3 mined successfully"
        );
        assert!(
            LedgerEvent::TamperSimulated { compromised: 2 }
                .to_string()
                .contains("2 block(s) compromised")
        );

        let failed = ValidationReport {
            is_valid: false,
            defects: vec![Defect {
                index: 1,
                kind: DefectKind::HashMismatch,
            }],
        };
        let msg = LedgerEvent::ChainValidated { report: failed }.to_string();
        assert!(msg.starts_with("ATTACK DETECTED"));
        assert!(msg.contains("Block 1: hash mismatch"));
    }

    #[test]
    fn idle_status_is_not_mining() {
        assert_eq!(
            MiningStatus::idle(),
            MiningStatus {
                mining: false,
                progress: 0
            }
        );
        assert!(MiningStatus::started().mining);
    }
}
