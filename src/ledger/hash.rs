use sha2::{Digest, Sha256};

use super::Block;

/// Compute the SHA-256 digest of a block for chain linkage.
///
/// The block is serialized through `serde_json::Value`, whose object maps
/// keep keys in sorted order, so semantically identical blocks always hash
/// to the same lowercase hex string no matter how they were built or parsed.
/// The same digest is used when a block is created, when it is re-validated,
/// and when it seeds the next block's `previous_hash`.
pub fn block_digest(block: &Block) -> String {
    let canonical = serde_json::to_value(block).expect("serialize block");
    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Compute the SHA-256 digest of a combined proof value.
///
/// The combining function can go negative, so the preimage is the decimal
/// rendering of a signed integer.
pub fn proof_digest(combined: i128) -> String {
    let mut hasher = Sha256::new();
    hasher.update(combined.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
