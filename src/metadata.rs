use serde::Deserialize;
use tracing::{debug, warn};

const BIOME_TRAIT: &str = "Biome";

#[derive(Debug, Deserialize)]
struct TokenMetadata {
    #[serde(default)]
    attributes: Vec<Attribute>,
}

#[derive(Debug, Deserialize)]
struct Attribute {
    trait_type: String,
    value: serde_json::Value,
}

impl TokenMetadata {
    fn biome(&self) -> Option<String> {
        self.attributes
            .iter()
            .find(|a| a.trait_type == BIOME_TRAIT)
            .and_then(|a| match &a.value {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            })
    }
}

#[derive(Clone)]
pub struct MetadataFetcher {
    http: reqwest::Client,
    base_url: String,
}

impl MetadataFetcher {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Best effort: every failure is logged and reported as `None`.
    pub async fn fetch_biome(&self, token_id: &str) -> Option<String> {
        let url = format!("{}/{}", self.base_url, token_id);

        let response = match self.http.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Error fetching metadata for token {}: {}", token_id, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "Metadata lookup for token {} returned {}",
                token_id,
                response.status()
            );
            return None;
        }

        match response.json::<TokenMetadata>().await {
            Ok(metadata) => {
                let biome = metadata.biome();
                debug!("Token {} biome: {:?}", token_id, biome);
                biome
            }
            Err(e) => {
                warn!("Malformed metadata for token {}: {}", token_id, e);
                None
            }
        }
    }
}
