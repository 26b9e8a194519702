use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::Block;

/// The `{chain, length}` payload served by `/get_chain/` and parsed back
/// from peers during consensus. One type covers both directions, so the
/// serving and consuming field names agree by construction; blocks are
/// matched by field name, not position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Transport-level failures while pulling a peer's chain.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("peer answered with status {0}")]
    Status(StatusCode),
}

/// Pulls a peer's chain. The HTTP implementation below is the production
/// one; tests swap in a canned fetcher.
#[async_trait]
pub trait ChainFetcher {
    async fn fetch_chain(&self, address: &str) -> Result<ChainSnapshot, FetchError>;
}

/// `ChainFetcher` over plain HTTP with bounded per-request timeouts.
pub struct HttpChainFetcher {
    client: Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, address: &str) -> Result<ChainSnapshot, FetchError> {
        let url = format!("http://{address}/api/v1/get_chain/");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response.json::<ChainSnapshot>().await?)
    }
}
