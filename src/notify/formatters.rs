use crate::models::{MintEvent, UNKNOWN_BIOME, biome_emoji, shorten_address};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

const BOT_USERNAME: &str = "Monad Lands Bot";
const BOT_AVATAR_URL: &str = "https://monadlands.xyz/logo.png";
const EMBED_COLOR: u32 = 0xFFD93D;
const EMBED_FOOTER: &str = "Monad Lands | monadlands.xyz";
const EXPLORER_TX_URL: &str = "https://monadscan.com/tx/";
const BIOME_PLACEHOLDER: &str = "Cargando...";
const BATCH_LISTED_IDS: usize = 3;

#[derive(Debug, Serialize)]
pub struct WebhookMessage {
    pub username: String,
    pub avatar_url: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

impl EmbedField {
    fn new(name: &str, value: String, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value,
            inline,
        }
    }
}

pub fn format_chat_message(event: &MintEvent) -> WebhookMessage {
    let emoji = biome_emoji(&event.biome);
    let biome = if event.biome.is_empty() {
        BIOME_PLACEHOLDER.to_string()
    } else {
        event.biome.clone()
    };

    let mut fields = vec![
        EmbedField::new("🏝️ Land", format!("#{}", event.token_id), true),
        EmbedField::new(
            "👤 Minter",
            format!("`{}`", shorten_address(&event.minter)),
            true,
        ),
        EmbedField::new("🌍 Bioma", biome, true),
    ];

    if let Some(hash) = event.transaction_hash {
        fields.push(EmbedField::new(
            "🔗 Transaccion",
            format!("[Ver en MonadScan]({EXPLORER_TX_URL}{hash})"),
            false,
        ));
    }

    WebhookMessage {
        username: BOT_USERNAME.to_string(),
        avatar_url: BOT_AVATAR_URL.to_string(),
        embeds: vec![Embed {
            title: format!("{emoji} Nueva Land Minteada! #{}", event.token_id),
            color: EMBED_COLOR,
            fields,
            footer: EmbedFooter {
                text: EMBED_FOOTER.to_string(),
            },
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }],
    }
}

/// Text for a social post covering `events`; `None` when there is nothing to announce.
pub fn format_tweet(events: &[MintEvent]) -> Option<String> {
    match events {
        [] => None,
        [event] => Some(format_single_tweet(event)),
        _ => Some(format_batch_tweet(events)),
    }
}

fn format_single_tweet(event: &MintEvent) -> String {
    let emoji = biome_emoji(&event.biome);
    let biome = if event.biome.is_empty() {
        UNKNOWN_BIOME
    } else {
        event.biome.as_str()
    };

    format!(
        "{emoji} Land #{} just minted!\n\n\
         Biome: {biome}\n\n\
         Monad Lands: 6,000 unique lands on @moaboratory\n\
         Mint yours: monadlands.xyz\n\n\
         #Monad #NFT #MonadLands",
        event.token_id
    )
}

fn format_batch_tweet(events: &[MintEvent]) -> String {
    let count = events.len();
    let token_ids = events
        .iter()
        .take(BATCH_LISTED_IDS)
        .map(|e| format!("#{}", e.token_id))
        .collect::<Vec<_>>()
        .join(", ");
    let more = if count > BATCH_LISTED_IDS {
        format!(" and {} more!", count - BATCH_LISTED_IDS)
    } else {
        "!".to_string()
    };

    format!(
        "🔥 {count} Lands just minted!\n\n\
         {token_ids}{more}\n\n\
         The land rush is ON!\n\
         Mint yours: monadlands.xyz\n\n\
         #Monad #NFT #MonadLands"
    )
}
