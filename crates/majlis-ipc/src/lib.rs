//! Majlis IPC
//!
//! Message types exchanged between the platform adapter and the core

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static NEXT_TRACE_COUNTER: AtomicU64 = AtomicU64::new(1);

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn generate_trace_id() -> String {
    let ts = now_unix_secs();
    let n = NEXT_TRACE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("trace-{}-{}", ts, n)
}

/// One inbound text message, consumed by exactly one dispatch cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    pub trace_id: String,
    pub source_user_id: String,
    pub text: String,
    pub reply_token: String,
}

impl InboundEvent {
    pub fn new(source_user_id: &str, text: &str, reply_token: &str) -> Self {
        Self {
            trace_id: generate_trace_id(),
            source_user_id: source_user_id.to_string(),
            text: text.to_string(),
            reply_token: reply_token.to_string(),
        }
    }

    pub fn with_trace_id(mut self, trace_id: String) -> Self {
        self.trace_id = trace_id;
        self
    }
}

/// A button that sends `text` back to the bot as if the user typed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuButton {
    pub label: String,
    pub text: String,
}

impl MenuButton {
    pub fn new(label: &str, text: &str) -> Self {
        Self {
            label: label.to_string(),
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPage {
    pub title: String,
    pub buttons: Vec<MenuButton>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundReply {
    Text {
        text: String,
    },
    Menu {
        alt_text: String,
        pages: Vec<MenuPage>,
    },
}

impl OutboundReply {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundReply::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OutboundReply::Text { text } => Some(text.as_str()),
            OutboundReply::Menu { .. } => None,
        }
    }

    /// Short description for logs; never includes the reply body.
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundReply::Text { .. } => "text",
            OutboundReply::Menu { .. } => "menu",
        }
    }
}
