use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::blockchain::{
    Block, Defect, Ledger, LedgerEvent, MiningObserver, MiningStatus, ValidationReport,
};
use crate::config::AppConfig;
use crate::error::LedgerError;

/// Shared application state: one ledger plus what observers can see of it.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    pub mining: Arc<Mutex<MiningStatus>>,
    /// Cancel token of the current (or last) mining flight.
    pub cancel: Mutex<Arc<AtomicBool>>,
    pub message: Mutex<Option<String>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            ledger: Mutex::new(Ledger::with_policy(
                config.difficulty,
                config.mining_policy(),
            )),
            mining: Arc::new(Mutex::new(MiningStatus::idle())),
            cancel: Mutex::new(Arc::new(AtomicBool::new(false))),
            message: Mutex::new(None),
        }
    }

    /// Remember `event` as the latest user-facing message and return it.
    pub fn notify(&self, event: &LedgerEvent) -> String {
        let text = event.to_string();
        *self.message.lock().expect("mutex poisoned") = Some(text.clone());
        text
    }

    /// Record a failed operation as the latest message and turn it into an API error.
    pub fn notify_error(&self, err: LedgerError) -> ApiError {
        let text = match &err {
            LedgerError::EmptyData => LedgerEvent::EmptyData.to_string(),
            LedgerError::ChainLocked => LedgerEvent::ChainLocked.to_string(),
            other => other.to_string(),
        };
        *self.message.lock().expect("mutex poisoned") = Some(text);
        ApiError::Ledger(err)
    }

    pub fn mining_status(&self) -> MiningStatus {
        *self.mining.lock().expect("mutex poisoned")
    }

    /// Ask the in-flight search to stop. Returns whether one was running.
    pub fn cancel_mining(&self) -> bool {
        let status = self.mining.lock().expect("mutex poisoned");
        if status.mining {
            self.cancel
                .lock()
                .expect("mutex poisoned")
                .store(true, Ordering::Relaxed);
        }
        status.mining
    }
}

/// Publishes search progress into the shared status and relays cancellation.
///
/// Once its flight is cancelled or gone it stops writing, so a search whose
/// request was abandoned cannot overwrite the status of a later one.
pub struct StatusObserver {
    status: Arc<Mutex<MiningStatus>>,
    cancel: Arc<AtomicBool>,
}

impl MiningObserver for StatusObserver {
    fn on_progress(&mut self, attempts: u64) {
        if let Ok(mut status) = self.status.lock() {
            if !self.cancel.load(Ordering::Relaxed) {
                status.progress = attempts;
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// Marks the ledger as mining for as long as it is alive; only one at a time.
///
/// Dropping the flight (the request finished, failed or was abandoned by
/// the client) cancels its search at the next progress point.
pub struct MiningFlight {
    status: Arc<Mutex<MiningStatus>>,
    cancel: Arc<AtomicBool>,
}

impl MiningFlight {
    pub fn claim(state: &AppState) -> Result<Self, ApiError> {
        let mut status = state.mining.lock().expect("mutex poisoned");
        if status.mining {
            return Err(ApiError::MiningInProgress);
        }
        *status = MiningStatus::started();
        let cancel = Arc::new(AtomicBool::new(false));
        *state.cancel.lock().expect("mutex poisoned") = Arc::clone(&cancel);
        Ok(Self {
            status: Arc::clone(&state.mining),
            cancel,
        })
    }

    /// Observer bound to this flight's status and cancel token.
    pub fn observer(&self) -> StatusObserver {
        StatusObserver {
            status: Arc::clone(&self.status),
            cancel: Arc::clone(&self.cancel),
        }
    }
}

impl Drop for MiningFlight {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Ok(mut status) = self.status.lock() {
            *status = MiningStatus::idle();
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub difficulty: u32,
    pub chain_valid: bool,
    pub chain: &'a [Block],
}

#[derive(Serialize, Deserialize, Debug)]
pub struct StatusResponse {
    pub mining: bool,
    pub progress: u64,
    pub chain_valid: bool,
    pub length: usize,
    pub difficulty: u32,
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
    pub defects: Vec<Defect>,
    pub message: String,
}

impl ValidateResponse {
    pub fn new(report: &ValidationReport, ledger: &Ledger, message: String) -> Self {
        Self {
            valid: report.is_valid,
            length: ledger.len(),
            difficulty: ledger.difficulty(),
            defects: report.defects.clone(),
            message,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ResetResponse {
    pub length: usize,
    pub chain_valid: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DifficultyResponse {
    pub difficulty: u32,
    pub locked: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SetDifficultyRequest {
    /// Raw user input; clamped into `[1, 5]`, negatives included.
    pub difficulty: i64,
}

/* ---------- Mining API Models ---------- */

#[derive(Serialize, Deserialize, Debug)]
pub struct MineRequest {
    pub data: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MineResponse {
    pub block: Block,
    pub attempts: u64,
    pub difficulty: u32,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CancelResponse {
    pub cancelling: bool,
}

/* ---------- Tamper API Models ---------- */

#[derive(Serialize, Deserialize, Debug)]
pub struct TamperRequest {
    pub index: u64,
    pub data: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TamperResponse {
    pub index: u64,
    pub compromised: usize,
    pub chain_valid: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
