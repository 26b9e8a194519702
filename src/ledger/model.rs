use chrono::Utc;
use log::debug;

use super::{Block, validate};
use crate::error::LedgerError;
use crate::transaction::{Transaction, TransactionPool};

/// Single-writer ledger owning the block chain and the pending pool for the
/// lifetime of the process.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pool: TransactionPool,
    difficulty: u32,
}

impl Ledger {
    /// Initialize a ledger with exactly one genesis block.
    pub fn new(difficulty: u32) -> Self {
        Self {
            chain: vec![Block::genesis()],
            pool: TransactionPool::new(),
            difficulty,
        }
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Transactions waiting to be drained into the next block.
    pub fn pending(&self) -> &[Transaction] {
        self.pool.pending()
    }

    /// Return the last block in the chain.
    pub fn previous_block(&self) -> Result<&Block, LedgerError> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Queue a transaction and report the index of the block it should land
    /// in. The index is a forecast, not a guarantee: it only holds if no
    /// other block is sealed before the pool is drained.
    pub fn add_transaction(&mut self, tx: Transaction) -> Result<u64, LedgerError> {
        self.pool.push(tx)?;
        Ok(self.chain.len() as u64 + 1)
    }

    /// Seal a new block from the pending pool and append it to the chain.
    ///
    /// No proof validation happens here; the mining workflow is responsible
    /// for having obtained `proof` from the puzzle solver first.
    pub fn create_block(&mut self, proof: u64, previous_hash: String) -> &Block {
        let block = Block {
            index: self.chain.len() as u64 + 1,
            timestamp: Utc::now().timestamp(),
            proof,
            previous_hash,
            transactions: self.pool.drain(),
        };
        debug!(
            "sealed block #{} with {} txs",
            block.index,
            block.transactions.len()
        );
        self.chain.push(block);
        self.chain.last().expect("chain is never empty after a push")
    }

    /// Overwrite the chain wholesale. Only the consensus resolver calls
    /// this, after validating the candidate.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) {
        self.chain = candidate;
    }

    /// Validate the local chain end to end.
    pub fn is_valid(&self) -> Result<bool, LedgerError> {
        validate::validate_chain(&self.chain, self.difficulty)
    }
}
