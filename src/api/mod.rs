mod chain;
mod health;
mod mining;
pub mod models;
mod nodes;
mod tx;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::is_chain_valid)
            .service(chain::get_stats)
            .service(mining::mine_block)
            .service(tx::add_tx)
            .service(tx::get_mempool)
            .service(nodes::connect_node)
            .service(nodes::replace_chain),
    );
}
