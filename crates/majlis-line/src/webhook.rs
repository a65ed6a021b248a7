//! Webhook payload model
//!
//! Only text message events are turned into `InboundEvent`s; everything
//! else the platform delivers (follow, postback, stickers, ...) is skipped.

use anyhow::{anyhow, Result};
use majlis_ipc::InboundEvent;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const ANONYMOUS_USER: &str = "anonymous";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub message: Option<EventMessage>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub webhook_event_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

impl EventSource {
    /// Id used for scoring: the user when known, else the group or room.
    pub fn scoring_id(&self) -> &str {
        self.user_id
            .as_deref()
            .or(self.group_id.as_deref())
            .or(self.room_id.as_deref())
            .unwrap_or(ANONYMOUS_USER)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl WebhookEvent {
    fn into_inbound(self) -> Option<InboundEvent> {
        if self.event_type != "message" {
            debug!(event_type = %self.event_type, "Skipping non-message event");
            return None;
        }

        let message = self.message?;
        if message.message_type != "text" {
            debug!(message_type = %message.message_type, "Skipping non-text message");
            return None;
        }

        let text = message.text?;
        let reply_token = self.reply_token.filter(|token| !token.is_empty())?;
        let user_id = self
            .source
            .as_ref()
            .map(EventSource::scoring_id)
            .unwrap_or(ANONYMOUS_USER);

        let event = InboundEvent::new(user_id, &text, &reply_token);
        Some(match self.webhook_event_id {
            Some(id) => event.with_trace_id(id),
            None => event,
        })
    }
}

pub fn parse_payload(body: &[u8]) -> Result<WebhookPayload> {
    serde_json::from_slice(body).map_err(|e| anyhow!("webhook payload decode failed: {}", e))
}

/// Decode a webhook body into the text message events it carries, in
/// delivery order.
pub fn parse_inbound_events(body: &[u8]) -> Result<Vec<InboundEvent>> {
    let payload = parse_payload(body)?;
    Ok(payload
        .events
        .into_iter()
        .filter_map(WebhookEvent::into_inbound)
        .collect())
}
