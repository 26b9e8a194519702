use log::debug;

use super::{Block, hash, pow};
use crate::error::LedgerError;

/// Walk a candidate chain and check index continuity, hash linkage and the
/// puzzle predicate for every block after genesis.
///
/// A broken index sequence is structural corruption and comes back as an
/// error. A linkage or proof mismatch is the ordinary outcome of comparing
/// independently grown chains and comes back as `Ok(false)`. The genesis
/// block is never checked against a predecessor.
pub fn validate_chain(chain: &[Block], difficulty: u32) -> Result<bool, LedgerError> {
    for pair in chain.windows(2) {
        let (prev, block) = (&pair[0], &pair[1]);

        if block.index != prev.index + 1 {
            return Err(LedgerError::NonSequentialIndex {
                expected: prev.index + 1,
                actual: block.index,
            });
        }

        let regenerated = hash::block_digest(prev);
        debug!(
            "block #{}: recorded previous hash {}, regenerated {}",
            block.index, block.previous_hash, regenerated
        );
        if block.previous_hash != regenerated {
            // A single broken link rejects the whole chain.
            return Ok(false);
        }

        if !pow::verify(block.proof, prev.proof, difficulty) {
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::validate_chain;
    use crate::error::LedgerError;
    use crate::ledger::{Block, Ledger, hash, pow};
    use crate::transaction::Transaction;

    fn mined_chain(blocks: usize, difficulty: u32) -> Vec<Block> {
        let token = CancellationToken::new();
        let mut ledger = Ledger::new(difficulty);
        for i in 0..blocks {
            let previous = ledger.previous_block().unwrap().clone();
            let proof = pow::solve(previous.proof, difficulty, &token).unwrap();
            let previous_hash = hash::block_digest(&previous);
            ledger
                .add_transaction(Transaction::new("alice", "bob", i as f64))
                .unwrap();
            ledger.create_block(proof, previous_hash);
        }
        ledger.chain().to_vec()
    }

    #[test]
    fn honestly_mined_chain_is_valid() {
        let chain = mined_chain(3, 1);
        assert_eq!(validate_chain(&chain, 1), Ok(true));
    }

    #[test]
    fn a_lone_genesis_block_is_valid() {
        let chain = mined_chain(0, 1);
        assert_eq!(validate_chain(&chain, 1), Ok(true));
    }

    #[test]
    fn tampering_with_a_transaction_invalidates_the_chain() {
        let mut chain = mined_chain(3, 1);
        // Flip one amount in a middle block: the regenerated digest no
        // longer matches the next block's recorded previous_hash.
        chain[1].transactions[0].amount = 999.0;
        assert_eq!(validate_chain(&chain, 1), Ok(false));
    }

    #[test]
    fn broken_linkage_invalidates_the_chain() {
        let mut chain = mined_chain(2, 1);
        let last = chain.len() - 1;
        chain[last].previous_hash = String::from("not-the-real-digest");
        assert_eq!(validate_chain(&chain, 1), Ok(false));
    }

    #[test]
    fn bogus_proof_invalidates_the_chain() {
        let mut chain = mined_chain(2, 2);
        let last = chain.len() - 1;
        let previous_proof = chain[last - 1].proof;
        let bad = (0u64..).find(|p| !pow::verify(*p, previous_proof, 2)).unwrap();
        chain[last].proof = bad;
        assert_eq!(validate_chain(&chain, 2), Ok(false));
    }

    #[test]
    fn an_index_gap_is_structural_corruption() {
        let mut chain = mined_chain(3, 1);
        chain[2].index = 4; // indices become 1, 2, 4, ...
        assert_eq!(
            validate_chain(&chain, 1),
            Err(LedgerError::NonSequentialIndex {
                expected: 3,
                actual: 4
            })
        );
    }

    #[test]
    fn a_duplicate_index_is_structural_corruption() {
        let mut chain = mined_chain(2, 1);
        chain[2].index = 2;
        assert!(matches!(
            validate_chain(&chain, 1),
            Err(LedgerError::NonSequentialIndex { .. })
        ));
    }
}
