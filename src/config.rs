use std::env;
use std::time::Duration;

use crate::ledger::DEFAULT_DIFFICULTY;

/// Runtime settings sourced from the environment, with dev defaults.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
    /// How long a proof-of-work search may run before it is cancelled.
    pub solve_timeout: Duration,
    /// Per-request timeout when pulling a peer's chain.
    pub peer_timeout: Duration,
    /// Recipient of the per-block mining reward.
    pub reward_address: String,
}

impl NodeConfig {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);
        let difficulty: u32 = env::var("DIFFICULTY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DIFFICULTY);
        let solve_timeout = env::var("SOLVE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));
        let peer_timeout = env::var("PEER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(5));
        let reward_address = env::var("REWARD_ADDRESS").unwrap_or_else(|_| "miner".to_string());

        Self {
            host,
            port,
            difficulty,
            solve_timeout,
            peer_timeout,
            reward_address,
        }
    }
}
