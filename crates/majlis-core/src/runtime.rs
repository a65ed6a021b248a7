//! Event handling: dispatch one inbound event and deliver its reply

use crate::dispatcher::Dispatcher;
use crate::replies;
use majlis_ipc::{InboundEvent, OutboundReply};
use majlis_line::ReplySender;
use std::sync::Arc;
use tracing::{error, warn};

/// What happened to one inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Ignored,
    Replied,
    Apologized,
    SendFailed,
}

pub struct BotRuntime {
    dispatcher: Dispatcher,
    sender: Arc<dyn ReplySender>,
}

impl BotRuntime {
    pub fn new(dispatcher: Dispatcher, sender: Arc<dyn ReplySender>) -> Self {
        Self { dispatcher, sender }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn handle_event(&self, event: &InboundEvent) -> EventOutcome {
        let (reply, outcome) = match self.dispatcher.dispatch(&event.text, &event.source_user_id)
        {
            Ok(Some(reply)) => (reply, EventOutcome::Replied),
            Ok(None) => return EventOutcome::Ignored,
            Err(e) => {
                let command = self
                    .dispatcher
                    .table()
                    .lookup(&event.text)
                    .map(|spec| spec.keyword)
                    .unwrap_or("?");
                error!(
                    trace_id = %event.trace_id,
                    user_id = %event.source_user_id,
                    command,
                    "Command failed: {}",
                    e
                );
                (
                    OutboundReply::text(replies::APOLOGY_TEXT),
                    EventOutcome::Apologized,
                )
            }
        };

        if let Err(e) = self.sender.send_reply(&event.reply_token, &reply).await {
            warn!(
                trace_id = %event.trace_id,
                user_id = %event.source_user_id,
                kind = reply.kind(),
                "Reply delivery failed: {}",
                e
            );
            return EventOutcome::SendFailed;
        }

        outcome
    }

    /// Events are handled one after another so score updates follow
    /// delivery order.
    pub async fn handle_events(&self, events: &[InboundEvent]) -> Vec<EventOutcome> {
        let mut outcomes = Vec::with_capacity(events.len());
        for event in events {
            outcomes.push(self.handle_event(event).await);
        }
        outcomes
    }
}
