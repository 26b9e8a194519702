use actix_web::{HttpResponse, Responder, get, rt, web};
use log::{error, info, warn};
use tokio_util::sync::CancellationToken;

use super::models::{AppState, MineResponse};
use crate::ledger::{BLOCK_REWARD, hash, pow};
use crate::transaction::Transaction;

/// Mine one block: snapshot the chain tip under a short read lock, run the
/// proof search off the request executor, then seal the block under a brief
/// write lock.
#[get("/mine_block/")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let (previous_index, previous_proof, previous_hash, difficulty) = {
        let ledger = state.ledger.read().expect("lock poisoned");
        let previous = match ledger.previous_block() {
            Ok(block) => block.clone(),
            Err(err) => return HttpResponse::InternalServerError().body(err.to_string()),
        };
        let previous_hash = hash::block_digest(&previous);
        (
            previous.index,
            previous.proof,
            previous_hash,
            ledger.difficulty(),
        )
    };

    // The search is unbounded; a timer cancels it once the deadline passes.
    let cancel = CancellationToken::new();
    let deadline = cancel.clone();
    let timeout = state.config.solve_timeout;
    rt::spawn(async move {
        rt::time::sleep(timeout).await;
        deadline.cancel();
    });

    let solved = web::block(move || pow::solve(previous_proof, difficulty, &cancel)).await;
    let proof = match solved {
        Ok(Ok(proof)) => proof,
        Ok(Err(err)) => {
            warn!("GET /mine_block/ - search gave up: {err}");
            return HttpResponse::ServiceUnavailable().body(err.to_string());
        }
        Err(err) => {
            error!("GET /mine_block/ - blocking pool failure: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let block = {
        let mut ledger = state.ledger.write().expect("lock poisoned");
        // The tip may have moved while the solver ran; a stale proof would
        // break the linkage invariant, so the caller has to mine again.
        if ledger.len() as u64 != previous_index {
            return HttpResponse::Conflict()
                .body("chain advanced during the proof search, mine again");
        }

        let reward = Transaction::new(
            state.node_id.clone(),
            state.config.reward_address.clone(),
            BLOCK_REWARD,
        );
        if let Err(err) = ledger.add_transaction(reward) {
            return HttpResponse::InternalServerError().body(err.to_string());
        }
        ledger.create_block(proof, previous_hash).clone()
    };

    info!(
        "MINER - sealed block #{} (proof={}, difficulty={})",
        block.index, block.proof, difficulty
    );
    HttpResponse::Ok().json(MineResponse {
        message: "Congratulations, you just mined a block!".to_string(),
        index: block.index,
        timestamp: block.timestamp,
        proof: block.proof,
        previous_hash: block.previous_hash,
        transactions: block.transactions,
    })
}
