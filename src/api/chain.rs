use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info};

use super::error::ApiError;
use super::models::{
    AppState, ChainResponse, DifficultyResponse, ResetResponse, SetDifficultyRequest,
    StatusResponse, ValidateResponse,
};
use crate::blockchain::{ChainValidator, LedgerEvent, clamp_difficulty_input};

/// Get the full chain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ChainResponse {
        length: ledger.len(),
        difficulty: ledger.difficulty(),
        chain_valid: ledger.chain_valid(),
        chain: ledger.blocks(),
    })
}

/// Mining progress, chain verdict and the latest message.
#[get("/status/")]
pub async fn get_status(state: web::Data<AppState>) -> impl Responder {
    let mining = state.mining_status();
    let (length, difficulty, chain_valid) = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        (ledger.len(), ledger.difficulty(), ledger.chain_valid())
    };
    let message = state.message.lock().expect("mutex poisoned").clone();

    HttpResponse::Ok().json(StatusResponse {
        mining: mining.mining,
        progress: mining.progress,
        chain_valid,
        length,
        difficulty,
        message,
    })
}

/// Validate the whole chain and record the verdict.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    let report = ChainValidator::validate(&mut ledger);
    let message = state.notify(&LedgerEvent::ChainValidated {
        report: report.clone(),
    });
    debug!(
        "VALIDATE - {} defect(s) over {} block(s)",
        report.defects.len(),
        ledger.len()
    );
    HttpResponse::Ok().json(ValidateResponse::new(&report, &ledger, message))
}

/// Drop every block and unlock the chain.
#[post("/reset/")]
pub async fn reset_chain(state: web::Data<AppState>) -> impl Responder {
    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    ledger.reset();
    let message = state.notify(&LedgerEvent::ChainReset);
    HttpResponse::Ok().json(ResetResponse {
        length: ledger.len(),
        chain_valid: ledger.chain_valid(),
        message,
    })
}

/// Get current PoW difficulty.
#[get("/difficulty/")]
pub async fn get_difficulty(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(DifficultyResponse {
        difficulty: ledger.difficulty(),
        locked: !ledger.is_empty(),
    })
}

/// Update PoW difficulty (clamped to 1..=5, only while the chain is empty).
#[post("/difficulty/")]
pub async fn set_difficulty(
    state: web::Data<AppState>,
    body: web::Json<SetDifficultyRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    let difficulty = ledger.set_difficulty(clamp_difficulty_input(body.difficulty))?;
    info!(
        "difficulty set to {difficulty} (requested {})",
        body.difficulty
    );
    Ok(HttpResponse::Ok().json(DifficultyResponse {
        difficulty,
        locked: false,
    }))
}
