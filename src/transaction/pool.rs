use super::Transaction;
use crate::error::LedgerError;

/// Pending transactions not yet committed to a block.
#[derive(Debug, Default)]
pub struct TransactionPool {
    pending: Vec<Transaction>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Queue a transaction after structural validation. Nothing is mutated
    /// on rejection.
    pub fn push(&mut self, tx: Transaction) -> Result<(), LedgerError> {
        tx.validate()?;
        self.pending.push(tx);
        Ok(())
    }

    /// Atomically hand over and clear the pending set; called exactly once
    /// per block creation.
    pub fn drain(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::TransactionPool;
    use crate::transaction::Transaction;

    #[test]
    fn push_validates_before_queueing() {
        let mut pool = TransactionPool::new();
        assert!(pool.push(Transaction::new("alice", "bob", 2.5)).is_ok());
        assert_eq!(pool.len(), 1);

        assert!(pool.push(Transaction::new("", "bob", 1.0)).is_err());
        assert!(pool.push(Transaction::new("alice", " ", 1.0)).is_err());
        assert!(pool.push(Transaction::new("alice", "bob", -1.0)).is_err());
        assert!(pool.push(Transaction::new("alice", "bob", f64::NAN)).is_err());
        assert!(
            pool.push(Transaction::new("alice", "bob", f64::INFINITY))
                .is_err()
        );
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn zero_amounts_are_allowed() {
        let mut pool = TransactionPool::new();
        assert!(pool.push(Transaction::new("alice", "bob", 0.0)).is_ok());
    }

    #[test]
    fn drain_hands_over_everything_and_clears() {
        let mut pool = TransactionPool::new();
        pool.push(Transaction::new("alice", "bob", 1.0)).unwrap();
        pool.push(Transaction::new("bob", "carol", 2.0)).unwrap();

        let drained = pool.drain();
        assert_eq!(drained.len(), 2);
        assert!(pool.is_empty());
        assert!(pool.drain().is_empty());
    }
}
