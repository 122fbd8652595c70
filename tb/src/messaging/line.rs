//! LINE Messaging API client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{MessagingError, MessagingGateway, check_outbound};
use crate::config::LineConfig;

/// LINE Messaging API client
pub struct LineMessagingClient {
    access_token: String,
    base_url: String,
    http: Client,
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl<'a> TextMessage<'a> {
    fn new(text: &'a str) -> Self {
        Self { kind: "text", text }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Deserialize)]
struct LineErrorResponse {
    message: String,
}

impl LineMessagingClient {
    /// Create a new client from configuration
    ///
    /// Reads the channel access token from the environment variable named in
    /// config.
    pub fn from_config(config: &LineConfig) -> Result<Self, MessagingError> {
        debug!(base_url = %config.base_url, "from_config: called");
        let token = config
            .get_access_token()
            .map_err(|_| MessagingError::MissingAccessToken(config.channel_access_token_env.clone()))?;
        Self::new(token, &config.base_url, Duration::from_millis(config.timeout_ms))
    }

    /// Create a client with an explicit access token
    pub fn new(
        access_token: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, MessagingError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            access_token: access_token.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<(), MessagingError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "post: called");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<LineErrorResponse>(&text)
            .map(|e| e.message)
            .unwrap_or(text);
        warn!(status = status.as_u16(), %message, "post: platform returned error");
        Err(MessagingError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl MessagingGateway for LineMessagingClient {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), MessagingError> {
        check_outbound(reply_token, "reply token", text)?;
        let body = ReplyRequest {
            reply_token,
            messages: [TextMessage::new(text)],
        };
        self.post("/v2/bot/message/reply", &body).await?;
        info!("reply: sent");
        Ok(())
    }

    async fn push(&self, user_id: &str, text: &str) -> Result<(), MessagingError> {
        check_outbound(user_id, "user id", text)?;
        let body = PushRequest {
            to: user_id,
            messages: [TextMessage::new(text)],
        };
        self.post("/v2/bot/message/push", &body).await?;
        info!(%user_id, "push: sent");
        Ok(())
    }
}
