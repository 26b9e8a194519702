pub mod fetch;

pub use fetch::{ChainFetcher, ChainSnapshot, FetchError, HttpChainFetcher};

use std::collections::BTreeSet;
use std::sync::RwLock;

use futures::future;
use log::{debug, info, warn};
use reqwest::Url;

use crate::error::LedgerError;
use crate::ledger::{Block, Ledger, validate};

/// Known peer addresses in canonical `host:port` form.
///
/// A `BTreeSet` keeps the peers deduplicated and sorted, which pins down the
/// iteration order the consensus tie-break depends on.
#[derive(Debug, Default)]
pub struct NodeSet {
    addresses: BTreeSet<String>,
}

impl NodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize an address to `host:port` and store it. Re-registering an
    /// already known peer is a no-op.
    pub fn register(&mut self, address: &str) -> Result<String, LedgerError> {
        let raw = address.trim();
        let with_scheme = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("http://{raw}")
        };
        let url = Url::parse(&with_scheme)
            .map_err(|_| LedgerError::InvalidPeerAddress(raw.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| LedgerError::InvalidPeerAddress(raw.to_string()))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| LedgerError::InvalidPeerAddress(raw.to_string()))?;

        let canonical = format!("{host}:{port}");
        self.addresses.insert(canonical.clone());
        Ok(canonical)
    }

    /// Sorted snapshot of every known peer.
    pub fn addresses(&self) -> Vec<String> {
        self.addresses.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Longest-valid-chain consensus.
///
/// Every peer is polled concurrently with bounded timeouts; a transport
/// failure skips that peer without aborting the round. Answers are examined
/// in sorted peer order, and the first strictly longer chain that validates
/// becomes the candidate. An equal-length peer chain never wins, so the
/// local chain is favored on ties. On adoption the chain is replaced in one
/// atomic write and the call returns `Ok(true)`; otherwise `Ok(false)` with
/// the local chain untouched.
pub async fn resolve<F>(
    ledger: &RwLock<Ledger>,
    peers: &[String],
    fetcher: &F,
) -> Result<bool, LedgerError>
where
    F: ChainFetcher + Sync,
{
    let (local_len, difficulty) = {
        let ledger = ledger.read().expect("lock poisoned");
        (ledger.len(), ledger.difficulty())
    };

    let responses = future::join_all(peers.iter().map(|addr| fetcher.fetch_chain(addr))).await;

    let mut best_len = local_len;
    let mut candidate: Option<Vec<Block>> = None;

    for (address, response) in peers.iter().zip(responses) {
        let snapshot = match response {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("consensus: skipping peer {address}: {err}");
                continue;
            }
        };

        if snapshot.length != snapshot.chain.len() {
            warn!(
                "consensus: peer {address} reported length {} for a chain of {} blocks, skipping",
                snapshot.length,
                snapshot.chain.len()
            );
            continue;
        }

        if snapshot.length <= best_len {
            debug!(
                "consensus: peer {address} chain of length {} is not longer than {best_len}",
                snapshot.length
            );
            continue;
        }

        if validate::validate_chain(&snapshot.chain, difficulty)? {
            best_len = snapshot.length;
            candidate = Some(snapshot.chain);
        } else {
            debug!("consensus: peer {address} chain failed validation");
        }
    }

    match candidate {
        Some(chain) => {
            let adopted_len = chain.len();
            ledger.write().expect("lock poisoned").replace_chain(chain);
            info!("consensus: adopted a longer valid chain of length {adopted_len}");
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::RwLock;

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use tokio_util::sync::CancellationToken;

    use super::{ChainFetcher, ChainSnapshot, FetchError, NodeSet, resolve};
    use crate::error::LedgerError;
    use crate::ledger::{Ledger, hash, pow};
    use crate::transaction::Transaction;

    struct FakeFetcher {
        chains: HashMap<String, ChainSnapshot>,
    }

    #[async_trait]
    impl ChainFetcher for FakeFetcher {
        async fn fetch_chain(&self, address: &str) -> Result<ChainSnapshot, FetchError> {
            self.chains
                .get(address)
                .cloned()
                .ok_or(FetchError::Status(StatusCode::BAD_GATEWAY))
        }
    }

    fn mined_ledger(blocks: usize, difficulty: u32) -> Ledger {
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
        ledger
    }

    fn snapshot(ledger: &Ledger) -> ChainSnapshot {
        ChainSnapshot {
            chain: ledger.chain().to_vec(),
            length: ledger.len(),
        }
    }

    #[test]
    fn register_normalizes_to_host_and_port() {
        let mut nodes = NodeSet::new();
        assert_eq!(
            nodes.register("http://127.0.0.1:5000").unwrap(),
            "127.0.0.1:5000"
        );
        assert_eq!(nodes.register("127.0.0.1:5000/").unwrap(), "127.0.0.1:5000");
        assert_eq!(nodes.len(), 1);

        assert_eq!(nodes.register("http://example.com").unwrap(), "example.com:80");
    }

    #[test]
    fn register_rejects_garbage() {
        let mut nodes = NodeSet::new();
        assert!(matches!(
            nodes.register(""),
            Err(LedgerError::InvalidPeerAddress(_))
        ));
        assert!(nodes.is_empty());
    }

    #[test]
    fn addresses_come_back_sorted() {
        let mut nodes = NodeSet::new();
        nodes.register("b-host:1000").unwrap();
        nodes.register("a-host:1000").unwrap();
        nodes.register("c-host:1000").unwrap();
        assert_eq!(
            nodes.addresses(),
            vec!["a-host:1000", "b-host:1000", "c-host:1000"]
        );
    }

    #[actix_web::test]
    async fn adopts_the_longest_valid_peer_chain() {
        let local = RwLock::new(mined_ledger(2, 1)); // length 3

        let mut tampered = snapshot(&mined_ledger(4, 1)); // length 5, corrupted below
        tampered.chain[2].transactions[0].amount = 1_000_000.0;
        let honest = snapshot(&mined_ledger(3, 1)); // length 4

        let fetcher = FakeFetcher {
            chains: HashMap::from([
                ("peer-a:8080".to_string(), tampered),
                ("peer-b:8080".to_string(), honest),
            ]),
        };
        let peers = vec!["peer-a:8080".to_string(), "peer-b:8080".to_string()];

        let replaced = resolve(&local, &peers, &fetcher).await.unwrap();
        assert!(replaced);
        assert_eq!(local.read().unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn resolution_is_idempotent_after_adoption() {
        let local = RwLock::new(mined_ledger(0, 1));
        let fetcher = FakeFetcher {
            chains: HashMap::from([("peer-a:8080".to_string(), snapshot(&mined_ledger(2, 1)))]),
        };
        let peers = vec!["peer-a:8080".to_string()];

        assert!(resolve(&local, &peers, &fetcher).await.unwrap());
        assert_eq!(local.read().unwrap().len(), 3);

        // Same peers, no new blocks anywhere: nothing strictly longer exists.
        assert!(!resolve(&local, &peers, &fetcher).await.unwrap());
        assert_eq!(local.read().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn equal_length_peer_chains_are_never_adopted() {
        let local = RwLock::new(mined_ledger(2, 1));
        let before = local.read().unwrap().previous_block().unwrap().clone();

        let fetcher = FakeFetcher {
            chains: HashMap::from([("peer-a:8080".to_string(), snapshot(&mined_ledger(2, 1)))]),
        };
        let peers = vec!["peer-a:8080".to_string()];

        assert!(!resolve(&local, &peers, &fetcher).await.unwrap());
        let after = local.read().unwrap().previous_block().unwrap().clone();
        assert_eq!(hash::block_digest(&before), hash::block_digest(&after));
    }

    #[actix_web::test]
    async fn unreachable_peers_are_skipped() {
        let local = RwLock::new(mined_ledger(0, 1));
        let fetcher = FakeFetcher {
            chains: HashMap::from([("peer-b:8080".to_string(), snapshot(&mined_ledger(2, 1)))]),
        };
        // peer-a has no canned response and fails with a transport error.
        let peers = vec!["peer-a:8080".to_string(), "peer-b:8080".to_string()];

        assert!(resolve(&local, &peers, &fetcher).await.unwrap());
        assert_eq!(local.read().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn a_peer_lying_about_length_is_skipped() {
        let local = RwLock::new(mined_ledger(0, 1));
        let mut lying = snapshot(&mined_ledger(2, 1));
        lying.length = 10;

        let fetcher = FakeFetcher {
            chains: HashMap::from([("peer-a:8080".to_string(), lying)]),
        };
        let peers = vec!["peer-a:8080".to_string()];

        assert!(!resolve(&local, &peers, &fetcher).await.unwrap());
        assert_eq!(local.read().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn structural_corruption_in_a_peer_chain_propagates() {
        let local = RwLock::new(mined_ledger(0, 1));
        let mut broken = snapshot(&mined_ledger(3, 1));
        broken.chain[2].index = 9;

        let fetcher = FakeFetcher {
            chains: HashMap::from([("peer-a:8080".to_string(), broken)]),
        };
        let peers = vec!["peer-a:8080".to_string()];

        let err = resolve(&local, &peers, &fetcher).await.unwrap_err();
        assert!(matches!(err, LedgerError::NonSequentialIndex { .. }));
        assert_eq!(local.read().unwrap().len(), 1);
    }
}
