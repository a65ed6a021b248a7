//! Majlis LINE Adapter
//!
//! LINE Messaging API webhook model, signature verification, reply client,
//! and reply serialization (text chunks, flex carousel menus)

pub mod messages;
pub mod signature;
pub mod webhook;

use anyhow::{anyhow, Result};
use majlis_config::LineConfig;
use majlis_ipc::OutboundReply;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub use messages::to_line_messages;
pub use signature::{compute_signature, verify_signature, SIGNATURE_HEADER};
pub use webhook::{parse_inbound_events, WebhookPayload};

/// Outbound side of the platform: answer one event through its reply token.
#[async_trait::async_trait]
pub trait ReplySender: Send + Sync {
    async fn send_reply(&self, reply_token: &str, reply: &OutboundReply) -> Result<()>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotInfo {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub basic_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

pub struct LineClient {
    client: Client,
    access_token: String,
    api_base_url: String,
}

impl LineClient {
    pub fn new(config: &LineConfig) -> Result<Self> {
        Ok(Self {
            client: Self::build_client()?,
            access_token: config.channel_access_token.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_client() -> Result<Client> {
        ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(600))
            .pool_max_idle_per_host(10)
            .tcp_keepalive(Some(Duration::from_secs(30)))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| anyhow!("failed to build HTTP client: {}", e))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    pub fn reply_payload(reply_token: &str, reply: &OutboundReply) -> serde_json::Value {
        serde_json::json!({
            "replyToken": reply_token,
            "messages": to_line_messages(reply),
        })
    }

    pub async fn reply(&self, reply_token: &str, reply: &OutboundReply) -> Result<()> {
        let url = self.endpoint("/v2/bot/message/reply");
        let payload = Self::reply_payload(reply_token, reply);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow!("line reply request failed: {}", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("line reply HTTP {}: {}", status, body));
        }

        debug!(kind = reply.kind(), "LINE reply delivered");
        Ok(())
    }

    pub async fn bot_info(&self) -> Result<BotInfo> {
        let url = self.endpoint("/v2/bot/info");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| anyhow!("line bot info request failed: {}", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("line bot info HTTP {}: {}", status, body));
        }

        resp.json()
            .await
            .map_err(|e| anyhow!("line bot info decode failed: {}", e))
    }
}

#[async_trait::async_trait]
impl ReplySender for LineClient {
    async fn send_reply(&self, reply_token: &str, reply: &OutboundReply) -> Result<()> {
        self.reply(reply_token, reply).await
    }
}
