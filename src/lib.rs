//! Hash-chained ledger secured by Proof-of-Work, with end-to-end chain
//! validation and a tamper simulator that shows how an edit breaks the chain.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;

pub use error::{LedgerError, Result};
