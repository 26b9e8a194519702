use tokio_util::sync::CancellationToken;

use super::hash;
use crate::error::LedgerError;

/// How many candidate proofs to try between cancellation checks.
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Combine a proof with its predecessor into the puzzle preimage.
///
/// Deliberately asymmetric: swapping the arguments changes the result, so a
/// block's proof cannot be copied from or swapped with its predecessor's.
pub fn combine(proof: u64, previous_proof: u64) -> i128 {
    let a = proof as i128;
    let b = previous_proof as i128;
    a * a - b * b
}

/// True iff the digest carries `difficulty` leading zero hex characters.
pub fn satisfies(digest: &str, difficulty: u32) -> bool {
    digest.chars().take(difficulty as usize).all(|c| c == '0')
}

/// Check a proof against its predecessor without re-running the search.
pub fn verify(proof: u64, previous_proof: u64, difficulty: u32) -> bool {
    satisfies(&hash::proof_digest(combine(proof, previous_proof)), difficulty)
}

/// Brute-force the smallest proof satisfying the puzzle predicate.
///
/// The search is CPU-bound with no upper bound on iterations (expected work
/// is `16^difficulty` attempts). Callers run it off the request executor and
/// abort it through `cancel` once a deadline passes.
pub fn solve(
    previous_proof: u64,
    difficulty: u32,
    cancel: &CancellationToken,
) -> Result<u64, LedgerError> {
    let mut proof: u64 = 0;
    loop {
        if proof % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
            return Err(LedgerError::SolveInterrupted);
        }
        if verify(proof, previous_proof, difficulty) {
            return Ok(proof);
        }
        proof = proof.wrapping_add(1);
    }
}
