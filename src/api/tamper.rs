use actix_web::{HttpResponse, post, web};

use super::error::ApiError;
use super::models::{AppState, TamperRequest, TamperResponse};
use crate::blockchain::{LedgerEvent, TamperSimulator};

/// Overwrite a block's data without re-mining it.
#[post("/tamper/")]
pub async fn tamper_block(
    state: web::Data<AppState>,
    req: web::Json<TamperRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    let report = TamperSimulator::tamper(&mut ledger, req.index, &req.data)
        .map_err(|e| state.notify_error(e))?;
    let message = state.notify(&LedgerEvent::TamperSimulated {
        compromised: report.compromised,
    });

    Ok(HttpResponse::Ok().json(TamperResponse {
        index: report.index,
        compromised: report.compromised,
        chain_valid: ledger.chain_valid(),
        message,
    }))
}
