use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use rust_hashchain::api::{self, AppState};
use rust_hashchain::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = AppConfig::from_env();
    info!(
        "⛓️ Starting hash-chain ledger at http://{}:{} (difficulty={})",
        config.host, config.port, config.difficulty
    );

    let state = web::Data::new(AppState::new(&config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
