use alloy_primitives::Address;
use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

pub const POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const TWEET_COOLDOWN: Duration = Duration::from_secs(60);

const DEFAULT_CONTRACT_ADDRESS: &str = "0xe69A019fbb056f2ED2281105bD2ae0095585a738";
const DEFAULT_RPC_URL: &str = "https://rpc.monad.xyz";
const DEFAULT_METADATA_BASE_URL: &str =
    "https://4everland.io/ipfs/bafybeidp6pj6v5qioqgr5rnunetwezujp3m7ab35rlcaavfzfpnxsmmk4q";

#[derive(Debug, Clone)]
pub struct TwitterCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

impl TwitterCredentials {
    /// All four values are required; a partial set disables posting.
    pub fn from_parts(
        api_key: Option<String>,
        api_secret: Option<String>,
        access_token: Option<String>,
        access_secret: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            api_key: api_key?,
            api_secret: api_secret?,
            access_token: access_token?,
            access_secret: access_secret?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub json_rpc_url: String,
    pub contract_address: Address,
    pub metadata_base_url: String,
    pub discord_webhook_url: Option<String>,
    pub twitter: Option<TwitterCredentials>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let json_rpc_url =
            non_empty_var("MONAD_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let contract_address_str = non_empty_var("CONTRACT_ADDRESS")
            .unwrap_or_else(|| DEFAULT_CONTRACT_ADDRESS.to_string());
        let contract_address = Address::from_str(&contract_address_str)
            .context("Invalid CONTRACT_ADDRESS format")?;

        let metadata_base_url = non_empty_var("METADATA_BASE_URL")
            .unwrap_or_else(|| DEFAULT_METADATA_BASE_URL.to_string());

        let twitter = TwitterCredentials::from_parts(
            non_empty_var("TWITTER_API_KEY"),
            non_empty_var("TWITTER_API_SECRET"),
            non_empty_var("TWITTER_ACCESS_TOKEN"),
            non_empty_var("TWITTER_ACCESS_SECRET"),
        );

        Ok(Config {
            json_rpc_url,
            contract_address,
            metadata_base_url: metadata_base_url.trim_end_matches('/').to_string(),
            discord_webhook_url: non_empty_var("DISCORD_WEBHOOK_URL"),
            twitter,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
