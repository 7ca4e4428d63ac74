use actix_web::{HttpResponse, Responder, post, web};
use log::{debug, info};

use super::error::ApiError;
use super::models::{AppState, CancelResponse, MineRequest, MineResponse, MiningFlight};
use crate::blockchain::LedgerEvent;

/// Mine a block carrying `data` and append it.
///
/// The nonce search runs on the blocking pool without holding the ledger
/// lock, so `/status/` keeps reporting progress. The tip is re-checked on
/// commit; anything that moved it in the meantime voids the result. If the
/// client goes away, dropping `flight` stops the search.
#[post("/mine/")]
pub async fn mine_block(
    state: web::Data<AppState>,
    req: web::Json<MineRequest>,
) -> Result<HttpResponse, ApiError> {
    let flight = MiningFlight::claim(&state)?;

    let (template, pow) = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        let template = ledger
            .prepare_block(&req.data)
            .map_err(|e| state.notify_error(e))?;
        (template, ledger.proof_of_work())
    };
    state.notify(&LedgerEvent::MiningStarted);

    let mut observer = flight.observer();
    let (template, seal) = web::block(move || {
        pow.search(&template, &mut observer)
            .map(|seal| (template, seal))
    })
    .await?
    .map_err(|e| state.notify_error(e))?;
    debug!(
        "MINER - found nonce {} after {} attempts",
        seal.nonce, seal.attempts
    );

    let attempts = seal.attempts;
    let (block, difficulty) = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        let block = ledger
            .commit_block(template, seal)
            .map_err(|e| state.notify_error(e))?
            .clone();
        (block, ledger.difficulty())
    };

    let message = state.notify(&LedgerEvent::BlockMined { index: block.index });
    Ok(HttpResponse::Ok().json(MineResponse {
        block,
        attempts,
        difficulty,
        message,
    }))
}

/// Ask the in-flight search, if any, to stop at its next progress point.
#[post("/mine/cancel/")]
pub async fn cancel_mining(state: web::Data<AppState>) -> impl Responder {
    let cancelling = state.cancel_mining();
    if cancelling {
        info!("MINER - cancellation requested");
    }
    HttpResponse::Ok().json(CancelResponse { cancelling })
}
