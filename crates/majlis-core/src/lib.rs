//! Majlis Core
//!
//! Command table, dispatch, reply text, and the webhook server that ties
//! the LINE adapter to the content store and score table

pub mod commands;
pub mod dispatcher;
pub mod replies;
pub mod runtime;
pub mod server;

use anyhow::{Context, Result};
use majlis_config::Config;
use majlis_content::ContentStore;
use majlis_line::{LineClient, ReplySender};
use majlis_scores::{MemoryScoreTable, ScoreTable};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

pub use commands::{CommandAction, CommandSpec, CommandTable};
pub use dispatcher::{DispatchError, Dispatcher};
pub use runtime::{BotRuntime, EventOutcome};
pub use server::{router, start_http_server, WebhookState};

/// Composition root: content loaded once, an empty score table, and the
/// LINE client as the reply path.
pub struct MajlisApp {
    config: Config,
    content: Arc<ContentStore>,
    scores: Arc<dyn ScoreTable>,
    sender: Arc<dyn ReplySender>,
}

impl MajlisApp {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let content_dir = config.content_dir();
        let content = ContentStore::load(content_dir.as_deref());
        let empty = content.empty_categories();
        if !empty.is_empty() {
            warn!("Content categories with no entries: {:?}", empty);
        }

        let client = LineClient::new(&config.line).context("failed to create LINE client")?;

        Ok(Self::with_parts(
            config,
            Arc::new(content),
            Arc::new(MemoryScoreTable::new()),
            Arc::new(client),
        ))
    }

    pub fn with_parts(
        config: Config,
        content: Arc<ContentStore>,
        scores: Arc<dyn ScoreTable>,
        sender: Arc<dyn ReplySender>,
    ) -> Self {
        Self {
            config,
            content,
            scores,
            sender,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn runtime(&self) -> BotRuntime {
        let dispatcher = Dispatcher::new(self.content.clone(), self.scores.clone());
        BotRuntime::new(dispatcher, self.sender.clone())
    }

    pub fn router(&self) -> axum::Router {
        let state = Arc::new(WebhookState::new(
            self.runtime(),
            self.config.line.channel_secret.clone(),
        ));
        router(state, &self.config.server.webhook_path)
    }

    /// Serve the webhook until `shutdown_rx` flips to true.
    pub async fn run(&self, shutdown_rx: watch::Receiver<bool>) -> Result<()> {
        let bind = self.config.server.bind_address();
        info!(
            webhook_path = %self.config.server.webhook_path,
            "Majlis starting on {}",
            bind
        );

        let handle = start_http_server(&bind, self.router(), shutdown_rx)
            .await
            .with_context(|| format!("failed to bind {}", bind))?;
        handle.await.context("webhook server task failed")?;

        info!("Majlis stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::test_support::RecordingSender;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.line.channel_access_token = "token".to_string();
        config.line.channel_secret = "secret".to_string();
        config
    }

    #[test]
    fn new_rejects_missing_credentials() {
        assert!(MajlisApp::new(Config::default()).is_err());
    }

    #[test]
    fn new_loads_builtin_content_without_content_dir() {
        let app = MajlisApp::new(test_config()).unwrap();
        assert!(app.content.empty_categories().is_empty());
        assert!(app.scores.is_empty().unwrap());
    }

    #[tokio::test]
    async fn runtimes_share_one_score_table() {
        let sender = Arc::new(RecordingSender::default());
        let app = MajlisApp::with_parts(
            test_config(),
            Arc::new(ContentStore::builtin()),
            Arc::new(MemoryScoreTable::new()),
            sender.clone(),
        );

        let first = app.runtime();
        let second = app.runtime();
        first
            .handle_event(&majlis_ipc::InboundEvent::new("U1", "سؤال", "a"))
            .await;
        second
            .handle_event(&majlis_ipc::InboundEvent::new("U1", "نقاطي", "b"))
            .await;

        let sent = sender.sent();
        assert_eq!(
            sent[1].1.as_text(),
            Some(replies::points_text(1).as_str())
        );
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_signal() {
        let mut config = test_config();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        let app = MajlisApp::with_parts(
            config,
            Arc::new(ContentStore::builtin()),
            Arc::new(MemoryScoreTable::new()),
            Arc::new(RecordingSender::default()),
        );

        let (tx, rx) = watch::channel(false);
        let server = tokio::spawn(async move { app.run(rx).await });
        tx.send(true).unwrap();
        server.await.unwrap().unwrap();
    }
}
