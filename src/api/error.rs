use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::error::LedgerError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("mining already in progress")]
    MiningInProgress,

    #[error("mining worker unavailable")]
    Worker,
}

impl From<BlockingError> for ApiError {
    fn from(_: BlockingError) -> Self {
        ApiError::Worker
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Ledger(err) => match err {
                LedgerError::EmptyData => StatusCode::BAD_REQUEST,
                LedgerError::ChainLocked => StatusCode::LOCKED,
                LedgerError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
                LedgerError::DifficultyLocked | LedgerError::StaleTemplate => StatusCode::CONFLICT,
                LedgerError::MiningAborted { .. } | LedgerError::MiningCancelled => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                LedgerError::InvalidSeal => StatusCode::UNPROCESSABLE_ENTITY,
            },
            ApiError::MiningInProgress => StatusCode::CONFLICT,
            ApiError::Worker => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
