use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A value transfer, pending in the pool or committed into a block.
/// Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }

    /// Structural checks applied before a transaction enters the pool.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.sender.trim().is_empty() {
            return Err(LedgerError::InvalidTransaction("sender must not be empty"));
        }
        if self.receiver.trim().is_empty() {
            return Err(LedgerError::InvalidTransaction(
                "receiver must not be empty",
            ));
        }
        if !self.amount.is_finite() {
            return Err(LedgerError::InvalidTransaction(
                "amount must be a finite number",
            ));
        }
        if self.amount < 0.0 {
            return Err(LedgerError::InvalidTransaction(
                "amount must not be negative",
            ));
        }
        Ok(())
    }
}
