use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};

use crate::config::NodeConfig;
use crate::consensus::{HttpChainFetcher, NodeSet};
use crate::ledger::Ledger;
use crate::transaction::Transaction;

/// Shared application state: the single-writer ledger, the peer registry and
/// the outbound HTTP client used by consensus resolution.
pub struct AppState {
    pub ledger: RwLock<Ledger>,
    pub nodes: Mutex<NodeSet>,
    pub fetcher: HttpChainFetcher,
    /// Identity of this node, used as the sender of mining rewards.
    pub node_id: String,
    pub config: NodeConfig,
}

impl AppState {
    pub fn new(config: NodeConfig) -> Self {
        let fetcher =
            HttpChainFetcher::new(config.peer_timeout).expect("construct peer http client");
        Self {
            ledger: RwLock::new(Ledger::new(config.difficulty)),
            nodes: Mutex::new(NodeSet::new()),
            fetcher,
            node_id: uuid::Uuid::new_v4().simple().to_string(),
            config,
        }
    }
}

/* ---------- Mining API Models ---------- */

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub timestamp: i64,
    pub proof: u64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub message: String,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub block_index: u64,
}

#[derive(Serialize)]
pub struct MempoolResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct ConnectNodeRequest {
    pub address: String,
}

#[derive(Serialize)]
pub struct ConnectNodeResponse {
    pub message: String,
    pub address: String,
    pub total_nodes: usize,
}

#[derive(Serialize)]
pub struct ReplaceChainResponse {
    pub replaced: bool,
    pub message: String,
    pub length: usize,
}

/* ---------- Stats ---------- */

#[derive(Serialize)]
pub struct StatsResponse {
    pub height: usize,
    pub difficulty: u32,
    pub pending_txs: usize,
    pub peers: usize,
}
