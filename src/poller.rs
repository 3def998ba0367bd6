use crate::events::{MintLog, decode_mint};
use crate::metadata::MetadataFetcher;
use crate::models::{MintEvent, shorten_address};
use crate::notify::{ChatChannel, PostOutcome, SocialChannel};
use crate::rpc::ChainSource;
use anyhow::Result;
use futures::FutureExt;
use std::ops::RangeInclusive;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

/// Progress through the chain. Lives for the process only; a restart resumes from the tip.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollState {
    last_processed_block: Option<u64>,
}

impl PollState {
    pub fn last_processed_block(&self) -> Option<u64> {
        self.last_processed_block
    }

    /// First sighting of the chain starts just below the tip, so history is not backfilled.
    fn start_from(&mut self, latest_block: u64) -> u64 {
        *self.last_processed_block.get_or_insert_with(|| {
            let start = latest_block.saturating_sub(1);
            info!("Starting from block {}", start);
            start
        })
    }

    fn advance(&mut self, block: u64) {
        let next = self.last_processed_block.map_or(block, |last| last.max(block));
        self.last_processed_block = Some(next);
    }
}

/// Mints waiting for a social post, in chain order.
#[derive(Debug, Default)]
pub struct PendingBatch {
    events: Vec<MintEvent>,
}

impl PendingBatch {
    pub fn extend(&mut self, events: impl IntoIterator<Item = MintEvent>) {
        self.events.extend(events);
    }

    pub fn as_slice(&self) -> &[MintEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn clear(&mut self) {
        self.events.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub latest_block: u64,
    pub scanned: Option<RangeInclusive<u64>>,
    pub mints: usize,
    pub social: Option<PostOutcome>,
}

/// Drives mint discovery and notification. All state is owned here and only
/// mutated through `&mut self`, so there is a single writer.
pub struct Poller<C> {
    chain: C,
    metadata: MetadataFetcher,
    chat: ChatChannel,
    social: SocialChannel,
    state: PollState,
    pending: PendingBatch,
}

impl<C: ChainSource> Poller<C> {
    pub fn new(
        chain: C,
        metadata: MetadataFetcher,
        chat: ChatChannel,
        social: SocialChannel,
    ) -> Self {
        Self {
            chain,
            metadata,
            chat,
            social,
            state: PollState::default(),
            pending: PendingBatch::default(),
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn pending(&self) -> &PendingBatch {
        &self.pending
    }

    /// Polls forever. Each tick is awaited before the next one starts; firings
    /// missed while a tick runs are skipped.
    pub async fn run(&mut self, poll_interval: Duration) {
        info!("Polling every {} seconds...", poll_interval.as_secs());

        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            match AssertUnwindSafe(self.tick()).catch_unwind().await {
                Ok(Ok(report)) => debug!("Tick complete: {:?}", report),
                Ok(Err(e)) => error!("Polling error: {:#}", e),
                Err(_) => error!("Polling tick panicked, will retry on next interval"),
            }
        }
    }

    /// One poll. On error the last processed block is left untouched so the
    /// same range is scanned again next time.
    pub async fn tick(&mut self) -> Result<TickReport> {
        let latest_block = self.chain.latest_block().await?;
        let last_processed = self.state.start_from(latest_block);

        if latest_block <= last_processed {
            debug!(
                "No new blocks (latest {}, processed {})",
                latest_block, last_processed
            );
            return Ok(TickReport {
                latest_block,
                scanned: None,
                mints: 0,
                social: None,
            });
        }

        let from = last_processed + 1;
        info!("Scanning blocks {} to {}...", from, latest_block);
        let logs = self.chain.mint_logs(from, latest_block).await?;

        let mut minted = Vec::new();
        for log in &logs {
            let mint = match decode_mint(log) {
                Ok(Some(mint)) => mint,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Failed to decode transfer event: {}", e);
                    continue;
                }
            };

            let event = self.resolve(mint).await;
            self.chat.notify(&event).await;
            minted.push(event);
        }

        let mints = minted.len();
        self.pending.extend(minted);
        let social = self.flush_pending().await;

        self.state.advance(latest_block);
        debug!("Updated last processed block to {}", latest_block);

        Ok(TickReport {
            latest_block,
            scanned: Some(from..=latest_block),
            mints,
            social,
        })
    }

    async fn resolve(&self, mint: MintLog) -> MintEvent {
        let token_id = mint.token_id.to_string();
        info!(
            "Mint detected: Land #{} -> {}",
            token_id,
            shorten_address(&mint.minter)
        );

        let biome = self.metadata.fetch_biome(&token_id).await;
        MintEvent::new(token_id, mint.minter, biome, mint.transaction_hash)
    }

    /// Offers the whole pending batch to the social channel. The batch is only
    /// kept while the cooldown runs; a failed post is not retried.
    async fn flush_pending(&mut self) -> Option<PostOutcome> {
        if self.pending.is_empty() {
            return None;
        }

        match self.social.notify(self.pending.as_slice()).await {
            Ok(PostOutcome::CoolingDown) => Some(PostOutcome::CoolingDown),
            Ok(outcome) => {
                self.pending.clear();
                Some(outcome)
            }
            Err(e) => {
                error!(
                    "Twitter error: {:#}; dropping {} queued mint(s)",
                    e,
                    self.pending.len()
                );
                self.pending.clear();
                Some(PostOutcome::Failed)
            }
        }
    }
}
