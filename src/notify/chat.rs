use crate::models::MintEvent;
use crate::notify::formatters::format_chat_message;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Skipped,
    Failed,
}

#[derive(Clone)]
pub struct ChatChannel {
    http: reqwest::Client,
    webhook_url: Option<String>,
}

impl ChatChannel {
    pub fn new(http: reqwest::Client, webhook_url: Option<String>) -> Self {
        Self { http, webhook_url }
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// One message per mint. Failures are logged and never retried.
    pub async fn notify(&self, event: &MintEvent) -> Delivery {
        let Some(url) = self.webhook_url.as_deref() else {
            info!("Discord webhook not configured, skipping...");
            return Delivery::Skipped;
        };

        let message = format_chat_message(event);
        match self.http.post(url).json(&message).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("Discord notification sent for Land #{}", event.token_id);
                Delivery::Sent
            }
            Ok(resp) => {
                error!(
                    "Discord webhook error for Land #{}: {}",
                    event.token_id,
                    resp.status()
                );
                Delivery::Failed
            }
            Err(e) => {
                error!("Discord notification error for Land #{}: {}", event.token_id, e);
                Delivery::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mint() -> MintEvent {
        MintEvent::new("42".into(), Address::repeat_byte(0x33), Some("Volcanico".into()), None)
    }

    #[tokio::test]
    async fn posts_embed_to_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let channel = ChatChannel::new(reqwest::Client::new(), Some(format!("{}/hook", server.uri())));
        assert_eq!(channel.notify(&mint()).await, Delivery::Sent);

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body["embeds"][0]["title"].as_str().unwrap().starts_with("🌋"));
    }

    #[tokio::test]
    async fn unconfigured_webhook_is_skipped() {
        let channel = ChatChannel::new(reqwest::Client::new(), None);
        assert!(!channel.is_enabled());
        assert_eq!(channel.notify(&mint()).await, Delivery::Skipped);
    }

    #[tokio::test]
    async fn error_status_is_reported_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let channel = ChatChannel::new(reqwest::Client::new(), Some(server.uri()));
        assert_eq!(channel.notify(&mint()).await, Delivery::Failed);
    }
}
