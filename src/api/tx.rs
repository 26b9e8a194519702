use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, MempoolResponse, NewTxRequest, NewTxResponse};
use crate::transaction::Transaction;

/// Submit a transaction into the pending pool. Missing fields are rejected
/// by the JSON extractor before this handler runs.
#[post("/add_tx/")]
pub async fn add_tx(state: web::Data<AppState>, body: web::Json<NewTxRequest>) -> impl Responder {
    let tx = Transaction::new(body.sender.clone(), body.receiver.clone(), body.amount);

    let block_index = {
        let mut ledger = state.ledger.write().expect("lock poisoned");
        match ledger.add_transaction(tx) {
            Ok(index) => index,
            Err(err) => {
                warn!("POST /add_tx/ - rejected: {err}");
                return HttpResponse::BadRequest().body(err.to_string());
            }
        }
    };

    info!("POST /add_tx/ - queued for block #{block_index}");
    HttpResponse::Created().json(NewTxResponse {
        message: format!("This transaction will be added to block #{block_index}"),
        block_index,
    })
}

/// List the pending pool.
#[get("/mempool/")]
pub async fn get_mempool(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.read().expect("lock poisoned");
    HttpResponse::Ok().json(MempoolResponse {
        size: ledger.pending().len(),
        transactions: ledger.pending().to_vec(),
    })
}
