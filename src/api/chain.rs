use actix_web::{HttpResponse, Responder, get, web};
use log::error;

use super::models::{AppState, StatsResponse, ValidateResponse};
use crate::consensus::ChainSnapshot;

/// Get the full chain, in the same shape the consensus resolver parses
/// from peers.
#[get("/get_chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.read().expect("lock poisoned");
    HttpResponse::Ok().json(ChainSnapshot {
        chain: ledger.chain().to_vec(),
        length: ledger.len(),
    })
}

/// Validate the whole local chain.
#[get("/is_chain_valid/")]
pub async fn is_chain_valid(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.read().expect("lock poisoned");
    match ledger.is_valid() {
        Ok(valid) => {
            let message = if valid {
                "The chain is valid."
            } else {
                "The chain is NOT valid: a linkage or proof check failed."
            };
            HttpResponse::Ok().json(ValidateResponse {
                valid,
                length: ledger.len(),
                message: message.to_string(),
            })
        }
        Err(err) => {
            error!("GET /is_chain_valid/ - structural corruption: {err}");
            HttpResponse::InternalServerError().body(err.to_string())
        }
    }
}

/// Lightweight node overview.
#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let (height, difficulty, pending_txs) = {
        let ledger = state.ledger.read().expect("lock poisoned");
        (ledger.len(), ledger.difficulty(), ledger.pending().len())
    };
    let peers = state.nodes.lock().expect("mutex poisoned").len();

    HttpResponse::Ok().json(StatsResponse {
        height,
        difficulty,
        pending_txs,
        peers,
    })
}
