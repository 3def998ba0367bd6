use alloy_primitives::{Address, B256};
use chrono::{DateTime, Utc};

pub const UNKNOWN_BIOME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintEvent {
    pub token_id: String,
    pub minter: Address,
    pub biome: String,
    pub transaction_hash: Option<B256>,
    pub detected_at: DateTime<Utc>,
}

impl MintEvent {
    pub fn new(
        token_id: String,
        minter: Address,
        biome: Option<String>,
        transaction_hash: Option<B256>,
    ) -> Self {
        Self {
            token_id,
            minter,
            biome: biome
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| UNKNOWN_BIOME.to_string()),
            transaction_hash,
            detected_at: Utc::now(),
        }
    }
}

pub fn biome_emoji(biome: &str) -> &'static str {
    match biome {
        "Pradera" => "🌿",
        "Desierto" => "🏜️",
        "Volcanico" => "🌋",
        "Cyber-Monad" => "🤖",
        "Eldorado" => "👑",
        _ => "🏝️",
    }
}

/// `0x1234...abcd` form: first 6 and last 4 characters of the checksummed address.
pub fn shorten_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}
