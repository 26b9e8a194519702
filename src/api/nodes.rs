use actix_web::{HttpResponse, Responder, get, post, web};
use log::{error, info, warn};

use super::models::{AppState, ConnectNodeRequest, ConnectNodeResponse, ReplaceChainResponse};
use crate::consensus;

/// Register a peer address for later consensus rounds.
#[post("/connect_node/")]
pub async fn connect_node(
    state: web::Data<AppState>,
    body: web::Json<ConnectNodeRequest>,
) -> impl Responder {
    let (address, total_nodes) = {
        let mut nodes = state.nodes.lock().expect("mutex poisoned");
        let canonical = match nodes.register(&body.address) {
            Ok(canonical) => canonical,
            Err(err) => {
                warn!("POST /connect_node/ - rejected: {err}");
                return HttpResponse::BadRequest().body(err.to_string());
            }
        };
        (canonical, nodes.len())
    };

    info!("registered peer {address} ({total_nodes} known)");
    HttpResponse::Created().json(ConnectNodeResponse {
        message: format!("Peer {address} registered"),
        address,
        total_nodes,
    })
}

/// Run longest-valid-chain consensus against every known peer.
#[get("/replace_chain/")]
pub async fn replace_chain(state: web::Data<AppState>) -> impl Responder {
    let peers = state.nodes.lock().expect("mutex poisoned").addresses();

    match consensus::resolve(&state.ledger, &peers, &state.fetcher).await {
        Ok(replaced) => {
            let length = state.ledger.read().expect("lock poisoned").len();
            let message = if replaced {
                "The local chain was replaced by the longest valid chain"
            } else {
                "The local chain is already the longest valid chain seen"
            };
            HttpResponse::Ok().json(ReplaceChainResponse {
                replaced,
                message: message.to_string(),
                length,
            })
        }
        Err(err) => {
            error!("GET /replace_chain/ - structural corruption: {err}");
            HttpResponse::InternalServerError().body(err.to_string())
        }
    }
}
