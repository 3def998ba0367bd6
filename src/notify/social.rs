use crate::config::TwitterCredentials;
use crate::models::MintEvent;
use crate::notify::formatters::format_tweet;
use crate::notify::oauth::OAuthSigner;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const TWITTER_API_BASE: &str = "https://api.twitter.com";

/// Minimum spacing between successful posts.
#[derive(Debug, Clone)]
pub struct RateLimitWindow {
    last_sent_at: Option<Instant>,
    cooldown: Duration,
}

impl RateLimitWindow {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            last_sent_at: None,
            cooldown,
        }
    }

    pub fn is_open_at(&self, now: Instant) -> bool {
        match self.last_sent_at {
            None => true,
            Some(sent) => now.saturating_duration_since(sent) >= self.cooldown,
        }
    }

    pub fn remaining_at(&self, now: Instant) -> Duration {
        match self.last_sent_at {
            None => Duration::ZERO,
            Some(sent) => self
                .cooldown
                .saturating_sub(now.saturating_duration_since(sent)),
        }
    }

    pub fn record_sent(&mut self, now: Instant) {
        self.last_sent_at = Some(now);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// Posted; carries the id returned by the API.
    Posted(String),
    /// Cooldown still running. Nothing was sent and the caller keeps the batch.
    CoolingDown,
    /// No credentials configured.
    Disabled,
    /// The API rejected the post or could not be reached. The batch is dropped.
    Failed,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

pub struct SocialChannel {
    http: reqwest::Client,
    api_base: String,
    credentials: Option<TwitterCredentials>,
    window: RateLimitWindow,
}

impl SocialChannel {
    pub fn new(
        http: reqwest::Client,
        api_base: impl Into<String>,
        credentials: Option<TwitterCredentials>,
        cooldown: Duration,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            credentials,
            window: RateLimitWindow::new(cooldown),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn window(&self) -> &RateLimitWindow {
        &self.window
    }

    pub async fn notify(&mut self, events: &[MintEvent]) -> Result<PostOutcome> {
        self.notify_at(events, Instant::now()).await
    }

    /// Posts one announcement for `events`, using `now` for the rate-limit check.
    pub async fn notify_at(&mut self, events: &[MintEvent], now: Instant) -> Result<PostOutcome> {
        let Some(credentials) = self.credentials.as_ref() else {
            info!("Twitter not configured, skipping...");
            return Ok(PostOutcome::Disabled);
        };

        if !self.window.is_open_at(now) {
            info!(
                "Tweet cooldown active ({}s left), queuing {} mint(s)",
                self.window.remaining_at(now).as_secs(),
                events.len()
            );
            return Ok(PostOutcome::CoolingDown);
        }

        let text = format_tweet(events).context("Refusing to post an empty batch")?;
        let id = self.post_tweet(credentials, &text).await?;
        self.window.record_sent(now);

        info!("Tweet posted: {} ({} mint(s))", id, events.len());
        Ok(PostOutcome::Posted(id))
    }

    async fn post_tweet(&self, credentials: &TwitterCredentials, text: &str) -> Result<String> {
        let url = format!("{}/2/tweets", self.api_base);
        let authorization = OAuthSigner::new(credentials).authorization_header("POST", &url)?;

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(&json!({ "text": text }))
            .send()
            .await
            .context("Twitter request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Twitter API error {}: {}", status, body);
            anyhow::bail!("Twitter API error {}: {}", status, body);
        }

        let created: CreateTweetResponse = response
            .json()
            .await
            .context("Unexpected Twitter response body")?;
        Ok(created.data.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COOLDOWN: Duration = Duration::from_secs(60);

    fn credentials() -> TwitterCredentials {
        TwitterCredentials {
            api_key: "key".into(),
            api_secret: "secret".into(),
            access_token: "token".into(),
            access_secret: "access-secret".into(),
        }
    }

    fn mint(token_id: &str) -> MintEvent {
        MintEvent::new(
            token_id.to_string(),
            Address::repeat_byte(0x22),
            Some("Pradera".into()),
            None,
        )
    }

    async fn tweet_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .and(header_exists("authorization"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({ "data": { "id": "1790", "text": "ok" } })),
            )
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn window_opens_after_cooldown() {
        let start = Instant::now();
        let mut window = RateLimitWindow::new(COOLDOWN);
        assert!(window.is_open_at(start));

        window.record_sent(start);
        assert!(!window.is_open_at(start + Duration::from_secs(59)));
        assert_eq!(
            window.remaining_at(start + Duration::from_secs(50)),
            Duration::from_secs(10)
        );
        assert!(window.is_open_at(start + COOLDOWN));
    }

    #[tokio::test]
    async fn second_post_inside_cooldown_is_held() {
        let server = tweet_server().await;
        let mut channel =
            SocialChannel::new(reqwest::Client::new(), server.uri(), Some(credentials()), COOLDOWN);
        let t1 = Instant::now();

        let first = channel.notify_at(&[mint("1")], t1).await.unwrap();
        assert_eq!(first, PostOutcome::Posted("1790".into()));

        let second = channel
            .notify_at(&[mint("2")], t1 + Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(second, PostOutcome::CoolingDown);

        let third = channel.notify_at(&[mint("2")], t1 + COOLDOWN).await.unwrap();
        assert_eq!(third, PostOutcome::Posted("1790".into()));

        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn posts_batch_text() {
        let server = tweet_server().await;
        let mut channel =
            SocialChannel::new(reqwest::Client::new(), server.uri(), Some(credentials()), COOLDOWN);

        let events = [mint("1"), mint("2"), mint("3"), mint("4")];
        channel.notify(&events).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let text = body["text"].as_str().unwrap();
        assert!(text.contains("#1, #2, #3 and 1 more!"));
    }

    #[tokio::test]
    async fn missing_credentials_skip_without_sending() {
        let server = tweet_server().await;
        let mut channel = SocialChannel::new(reqwest::Client::new(), server.uri(), None, COOLDOWN);
        assert!(!channel.is_enabled());

        let outcome = channel.notify(&[mint("1")]).await.unwrap();
        assert_eq!(outcome, PostOutcome::Disabled);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_post_leaves_window_open() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("duplicate content"))
            .mount(&server)
            .await;
        let mut channel =
            SocialChannel::new(reqwest::Client::new(), server.uri(), Some(credentials()), COOLDOWN);
        let now = Instant::now();

        assert!(channel.notify_at(&[mint("1")], now).await.is_err());
        assert!(channel.window().is_open_at(now));
    }
}
