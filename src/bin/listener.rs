use anyhow::Result;
use mint_relay::config::{Config, POLL_INTERVAL, TWEET_COOLDOWN};
use mint_relay::metadata::MetadataFetcher;
use mint_relay::notify::{ChatChannel, SocialChannel, TWITTER_API_BASE};
use mint_relay::poller::Poller;
use mint_relay::rpc::RpcClient;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn configured(enabled: bool) -> &'static str {
    if enabled { "Configured" } else { "Not configured" }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    std::panic::set_hook(Box::new(|panic| {
        error!("Uncaught panic: {}", panic);
    }));

    info!("Starting Monad Lands mint listener");

    let config = Config::from_env()?;
    info!("Contract: {:?}", config.contract_address);
    info!("RPC: {}", config.json_rpc_url);

    let http = reqwest::Client::new();
    let metadata = MetadataFetcher::new(http.clone(), config.metadata_base_url.clone());
    let chat = ChatChannel::new(http.clone(), config.discord_webhook_url.clone());
    let social = SocialChannel::new(
        http,
        TWITTER_API_BASE,
        config.twitter.clone(),
        TWEET_COOLDOWN,
    );
    info!("Discord: {}", configured(chat.is_enabled()));
    info!("Twitter: {}", configured(social.is_enabled()));

    let client = RpcClient::new(&config.json_rpc_url, config.contract_address)?;
    let chain_id = match client.check_connectivity().await {
        Ok(chain_id) => chain_id,
        Err(e) => {
            error!("Failed to connect: {:#}", e);
            return Err(e);
        }
    };
    info!("Connected to {} (chainId: {})", client.url(), chain_id);

    let mut poller = Poller::new(client, metadata, chat, social);
    poller.run(POLL_INTERVAL).await;

    Ok(())
}
