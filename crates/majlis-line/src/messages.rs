//! OutboundReply to LINE message objects

use majlis_ipc::{MenuButton, MenuPage, OutboundReply};
use serde_json::{json, Value};
use tracing::warn;

pub const LINE_MAX_TEXT_LEN: usize = 5000;
pub const LINE_MAX_MESSAGES_PER_REPLY: usize = 5;
pub const LINE_MAX_CAROUSEL_BUBBLES: usize = 12;
pub const LINE_MAX_LABEL_LEN: usize = 20;
pub const LINE_MAX_ALT_TEXT_LEN: usize = 400;

pub fn to_line_messages(reply: &OutboundReply) -> Vec<Value> {
    match reply {
        OutboundReply::Text { text } => {
            let mut chunks = chunk_text(text, LINE_MAX_TEXT_LEN);
            if chunks.len() > LINE_MAX_MESSAGES_PER_REPLY {
                warn!(
                    "Reply text needs {} messages, truncating to {}",
                    chunks.len(),
                    LINE_MAX_MESSAGES_PER_REPLY
                );
                chunks.truncate(LINE_MAX_MESSAGES_PER_REPLY);
            }
            chunks
                .into_iter()
                .map(|chunk| json!({ "type": "text", "text": chunk }))
                .collect()
        }
        OutboundReply::Menu { alt_text, pages } => vec![flex_carousel(alt_text, pages)],
    }
}

fn flex_carousel(alt_text: &str, pages: &[MenuPage]) -> Value {
    if pages.len() > LINE_MAX_CAROUSEL_BUBBLES {
        warn!(
            "Menu has {} pages, carousel keeps the first {}",
            pages.len(),
            LINE_MAX_CAROUSEL_BUBBLES
        );
    }

    let bubbles: Vec<Value> = pages
        .iter()
        .take(LINE_MAX_CAROUSEL_BUBBLES)
        .map(menu_bubble)
        .collect();

    json!({
        "type": "flex",
        "altText": truncate_chars(alt_text, LINE_MAX_ALT_TEXT_LEN),
        "contents": {
            "type": "carousel",
            "contents": bubbles,
        }
    })
}

fn menu_bubble(page: &MenuPage) -> Value {
    json!({
        "type": "bubble",
        "header": {
            "type": "box",
            "layout": "vertical",
            "contents": [{
                "type": "text",
                "text": page.title,
                "weight": "bold",
                "size": "lg",
                "align": "center",
            }]
        },
        "body": {
            "type": "box",
            "layout": "vertical",
            "spacing": "sm",
            "contents": page.buttons.iter().map(menu_button).collect::<Vec<_>>(),
        }
    })
}

fn menu_button(button: &MenuButton) -> Value {
    json!({
        "type": "button",
        "style": "primary",
        "height": "sm",
        "action": {
            "type": "message",
            "label": truncate_chars(&button.label, LINE_MAX_LABEL_LEN),
            "text": button.text,
        }
    })
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Split on character count, preferring a whitespace or punctuation boundary.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < chars.len() {
        let mut end = (start + max_chars).min(chars.len());

        if end < chars.len() {
            let mut split = end;
            for i in (start..end).rev() {
                let c = chars[i];
                if c == '\n' || c == ' ' || c == '.' || c == '!' || c == '?' || c == '؟' {
                    split = i + 1;
                    break;
                }
            }
            if split > start {
                end = split;
            }
        }

        chunks.push(chars[start..end].iter().collect::<String>());
        start = end;
    }

    chunks
}
