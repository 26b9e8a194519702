use thiserror::Error;

/// Crate-wide error taxonomy.
///
/// `NonSequentialIndex` signals structural corruption of a chain and is
/// always propagated; an ordinary invalid chain (broken linkage or proof)
/// is reported as a plain `false` from validation, never through this enum.
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("non-sequential block index: expected {expected}, got {actual}")]
    NonSequentialIndex { expected: u64, actual: u64 },

    #[error("ledger chain is empty")]
    EmptyChain,

    #[error("invalid transaction: {0}")]
    InvalidTransaction(&'static str),

    #[error("proof-of-work search interrupted before a solution was found")]
    SolveInterrupted,

    #[error("invalid peer address `{0}`")]
    InvalidPeerAddress(String),
}
