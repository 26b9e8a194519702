mod api;
mod config;
mod consensus;
mod error;
mod ledger;
mod transaction;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;

use api::AppState;
use config::NodeConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env();
    let host = config.host.clone();
    let port = config.port;

    println!("⛓️ Starting ledger node at http://{host}:{port}");

    let state = web::Data::new(AppState::new(config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
