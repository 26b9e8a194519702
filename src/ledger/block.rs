use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A single block in the chain holding the transactions drained from the
/// pending pool. Created exactly once by the ledger, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
    pub proof: u64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        Self {
            index: 1,
            timestamp: Utc::now().timestamp(),
            proof: GENESIS_PROOF,
            previous_hash: String::from(GENESIS_PREVIOUS_HASH),
            transactions: Vec::new(),
        }
    }
}
