mod chain;
pub mod error;
mod health;
mod mining;
pub mod models;
mod tamper;

use actix_web::web::{self, ServiceConfig};

pub use error::ApiError;
pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::get_status)
            .service(chain::validate_chain)
            .service(chain::reset_chain)
            .service(chain::get_difficulty)
            .service(chain::set_difficulty)
            .service(mining::mine_block)
            .service(mining::cancel_mining)
            .service(tamper::tamper_block),
    );
}
