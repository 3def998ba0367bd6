use crate::events::Transfer;
use alloy::providers::fillers::FillProvider;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, Log};
use alloy::sol_types::SolEvent;
use alloy_primitives::{Address, B256};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

type AlloyFullProvider = FillProvider<
    alloy::providers::fillers::JoinFill<
        alloy::providers::Identity,
        alloy::providers::fillers::JoinFill<
            alloy::providers::fillers::GasFiller,
            alloy::providers::fillers::JoinFill<
                alloy::providers::fillers::BlobGasFiller,
                alloy::providers::fillers::JoinFill<
                    alloy::providers::fillers::NonceFiller,
                    alloy::providers::fillers::ChainIdFiller,
                >,
            >,
        >,
    >,
    alloy::providers::RootProvider,
>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only view of the chain used by the poller.
#[async_trait]
pub trait ChainSource {
    async fn latest_block(&self) -> Result<u64>;

    /// Transfer logs with a zero-address sender in the inclusive range `[from_block, to_block]`.
    async fn mint_logs(&self, from_block: u64, to_block: u64) -> Result<Vec<Log>>;
}

#[derive(Clone)]
pub struct RpcClient {
    provider: AlloyFullProvider,
    url: String,
    contract_address: Address,
    transfer_topic: B256,
}

impl RpcClient {
    pub fn new(rpc_url: &str, contract_address: Address) -> Result<Self> {
        let parsed_url = rpc_url
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid RPC URL: {}", rpc_url))?;
        let provider: AlloyFullProvider = ProviderBuilder::new().connect_http(parsed_url);

        Ok(RpcClient {
            provider,
            url: rpc_url.to_string(),
            contract_address,
            transfer_topic: Transfer::SIGNATURE_HASH,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Single attempt, bounded by `REQUEST_TIMEOUT`. Retrying is left to the next poll.
    async fn request<T, E, F>(&self, what: &str, future: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(REQUEST_TIMEOUT, future).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!("RPC error on {} during {}: {}", self.url, what, e);
                Err(anyhow::anyhow!("{} failed: {}", what, e))
            }
            Err(_) => {
                warn!(
                    "Request timeout after {} seconds on {} during {}",
                    REQUEST_TIMEOUT.as_secs(),
                    self.url,
                    what
                );
                Err(anyhow::anyhow!(
                    "{} timed out after {} seconds",
                    what,
                    REQUEST_TIMEOUT.as_secs()
                ))
            }
        }
    }

    /// Startup connectivity check; returns the chain id.
    pub async fn check_connectivity(&self) -> Result<u64> {
        self.request("eth_chainId", self.provider.get_chain_id())
            .await
            .with_context(|| format!("Failed to connect to {}", self.url))
    }

    fn mint_filter(&self, from_block: u64, to_block: u64) -> Filter {
        Filter::new()
            .address(self.contract_address)
            .event_signature(self.transfer_topic)
            .topic1(Address::ZERO.into_word())
            .from_block(from_block)
            .to_block(to_block)
    }
}

#[async_trait]
impl ChainSource for RpcClient {
    async fn latest_block(&self) -> Result<u64> {
        self.request("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    async fn mint_logs(&self, from_block: u64, to_block: u64) -> Result<Vec<Log>> {
        let filter = self.mint_filter(from_block, to_block);
        let logs = self
            .request("eth_getLogs", self.provider.get_logs(&filter))
            .await?;
        debug!(
            "Received {} logs for blocks {} to {}",
            logs.len(),
            from_block,
            to_block
        );
        Ok(logs)
    }
}
