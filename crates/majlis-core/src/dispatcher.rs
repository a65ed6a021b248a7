//! Command dispatch: text in, reply out, points recorded

use crate::commands::{CommandAction, CommandSpec, CommandTable};
use crate::replies;
use majlis_content::{ContentCategory, ContentError, ContentStore};
use majlis_ipc::OutboundReply;
use majlis_scores::{ScoreError, ScoreTable};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("content lookup failed: {0}")]
    Content(#[from] ContentError),
    #[error("score update failed: {0}")]
    Score(#[from] ScoreError),
}

pub struct Dispatcher {
    table: CommandTable,
    content: Arc<ContentStore>,
    scores: Arc<dyn ScoreTable>,
}

impl Dispatcher {
    pub fn new(content: Arc<ContentStore>, scores: Arc<dyn ScoreTable>) -> Self {
        Self::with_table(CommandTable::standard(), content, scores)
    }

    pub fn with_table(
        table: CommandTable,
        content: Arc<ContentStore>,
        scores: Arc<dyn ScoreTable>,
    ) -> Self {
        Self {
            table,
            content,
            scores,
        }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub fn scores(&self) -> &Arc<dyn ScoreTable> {
        &self.scores
    }

    /// `Ok(None)` means the text is not a command and no reply is sent.
    pub fn dispatch(
        &self,
        text: &str,
        user_id: &str,
    ) -> Result<Option<OutboundReply>, DispatchError> {
        let Some(spec) = self.table.lookup(text) else {
            debug!(chars = text.chars().count(), "Ignoring non-command text");
            return Ok(None);
        };

        debug!(command = spec.keyword, user_id = %user_id, "Dispatching command");
        self.run(spec, user_id).map(Some)
    }

    fn run(&self, spec: &CommandSpec, user_id: &str) -> Result<OutboundReply, DispatchError> {
        match spec.action {
            CommandAction::Help => Ok(replies::help_menu(&self.table)),
            CommandAction::MyPoints => {
                let total = self.scores.get(user_id)?;
                Ok(OutboundReply::text(replies::points_text(total)))
            }
            CommandAction::Leaderboard => {
                let top = self.scores.top(replies::LEADERBOARD_SIZE)?;
                Ok(OutboundReply::text(replies::leaderboard_text(&top)))
            }
            CommandAction::Content(category) => {
                let Some(item) = self.draw(category)? else {
                    return Ok(OutboundReply::text(replies::EMPTY_CONTENT_TEXT));
                };
                let reply = OutboundReply::text(item);
                self.award(spec, user_id)?;
                Ok(reply)
            }
            CommandAction::Analysis => {
                let Some(item) = self.draw(ContentCategory::PersonalityTrait)? else {
                    return Ok(OutboundReply::text(replies::EMPTY_CONTENT_TEXT));
                };
                let reply = OutboundReply::text(replies::analysis_text(item, spec.points));
                self.award(spec, user_id)?;
                Ok(reply)
            }
        }
    }

    /// `None` when the category has nothing to draw from.
    fn draw(&self, category: ContentCategory) -> Result<Option<&str>, DispatchError> {
        match self.content.random_from(category) {
            Ok(item) => Ok(Some(item)),
            Err(ContentError::EmptyCategory(category)) => {
                warn!(category = %category, "Content category is empty");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn award(&self, spec: &CommandSpec, user_id: &str) -> Result<(), DispatchError> {
        if spec.points == 0 {
            return Ok(());
        }
        let total = self.scores.add(user_id, spec.points)?;
        debug!(
            command = spec.keyword,
            user_id = %user_id,
            awarded = spec.points,
            total,
            "Points awarded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use majlis_scores::{MemoryScoreTable, ScoreEntry};
    use std::collections::HashMap;

    fn single_item_store() -> ContentStore {
        let mut lists = HashMap::new();
        for category in ContentCategory::ALL {
            lists.insert(category, vec![format!("{}-item", category.stem())]);
        }
        ContentStore::from_lists(lists)
    }

    fn dispatcher_with(store: ContentStore) -> (Dispatcher, Arc<MemoryScoreTable>) {
        let scores = Arc::new(MemoryScoreTable::new());
        let dispatcher = Dispatcher::new(Arc::new(store), scores.clone());
        (dispatcher, scores)
    }

    fn reply_text(reply: Option<OutboundReply>) -> String {
        reply
            .and_then(|r| r.as_text().map(str::to_string))
            .expect("text reply")
    }

    #[test]
    fn question_returns_item_and_awards_one_point() {
        let (dispatcher, scores) = dispatcher_with(single_item_store());
        let text = reply_text(dispatcher.dispatch("سؤال", "U1").unwrap());
        assert_eq!(text, "questions-item");
        assert_eq!(scores.get("U1").unwrap(), 1);
    }

    #[test]
    fn every_content_keyword_draws_from_its_category() {
        let (dispatcher, scores) = dispatcher_with(single_item_store());
        for category in ContentCategory::ALL {
            if category == ContentCategory::PersonalityTrait {
                continue;
            }
            let text = reply_text(dispatcher.dispatch(category.keyword(), "U1").unwrap());
            assert_eq!(text, format!("{}-item", category.stem()));
        }
        assert_eq!(scores.get("U1").unwrap(), 6);
    }

    #[test]
    fn analysis_awards_two_points() {
        let (dispatcher, scores) = dispatcher_with(single_item_store());
        let text = reply_text(dispatcher.dispatch("تحليل", "U1").unwrap());
        assert!(text.contains("personality-item"));
        assert!(text.contains("+2"));
        assert_eq!(scores.get("U1").unwrap(), 2);
    }

    #[test]
    fn my_points_reports_without_mutating() {
        let (dispatcher, scores) = dispatcher_with(single_item_store());
        dispatcher.dispatch("سؤال", "U1").unwrap();
        dispatcher.dispatch("تحليل", "U1").unwrap();

        let text = reply_text(dispatcher.dispatch("نقاطي", "U1").unwrap());
        assert_eq!(text, replies::points_text(3));
        assert_eq!(scores.get("U1").unwrap(), 3);

        let text = reply_text(dispatcher.dispatch("نقاطي", "U2").unwrap());
        assert_eq!(text, replies::points_text(0));
        assert_eq!(scores.len().unwrap(), 1);
    }

    #[test]
    fn leaderboard_on_empty_table() {
        let (dispatcher, scores) = dispatcher_with(single_item_store());
        let text = reply_text(dispatcher.dispatch("الصدارة", "U1").unwrap());
        assert_eq!(text, replies::NO_SCORES_TEXT);
        assert!(scores.is_empty().unwrap());
    }

    #[test]
    fn leaderboard_lists_top_five() {
        let (dispatcher, scores) = dispatcher_with(single_item_store());
        for (user, points) in [("A", 10), ("B", 30), ("C", 20), ("D", 5), ("E", 1), ("F", 2)] {
            scores.add(user, points).unwrap();
        }
        let text = reply_text(dispatcher.dispatch("الصدارة", "A").unwrap());
        assert!(text.contains("🥇 B — 30"));
        assert!(text.contains("🥈 C — 20"));
        assert!(text.contains("🥉 A — 10"));
        assert!(text.contains("5️⃣ F — 2"));
        assert!(!text.contains("E — 1"));
    }

    #[test]
    fn help_is_a_menu_and_awards_nothing() {
        let (dispatcher, scores) = dispatcher_with(single_item_store());
        let reply = dispatcher.dispatch("مساعدة", "U1").unwrap().unwrap();
        assert_eq!(reply.kind(), "menu");
        assert!(scores.is_empty().unwrap());
    }

    #[test]
    fn unmatched_text_has_no_reply_and_no_score() {
        let (dispatcher, scores) = dispatcher_with(single_item_store());
        assert!(dispatcher.dispatch("كيف الحال", "U1").unwrap().is_none());
        assert!(dispatcher.dispatch("سؤال؟", "U1").unwrap().is_none());
        assert!(scores.is_empty().unwrap());
    }

    #[test]
    fn surrounding_whitespace_still_matches() {
        let (dispatcher, scores) = dispatcher_with(single_item_store());
        assert!(dispatcher.dispatch("  لغز\n", "U1").unwrap().is_some());
        assert_eq!(scores.get("U1").unwrap(), 1);
    }

    #[test]
    fn empty_category_replies_with_fallback_and_awards_nothing() {
        let (dispatcher, scores) = dispatcher_with(ContentStore::from_lists(HashMap::new()));
        let text = reply_text(dispatcher.dispatch("تحدي", "U1").unwrap());
        assert_eq!(text, replies::EMPTY_CONTENT_TEXT);
        let text = reply_text(dispatcher.dispatch("تحليل", "U1").unwrap());
        assert_eq!(text, replies::EMPTY_CONTENT_TEXT);
        assert_eq!(scores.get("U1").unwrap(), 0);
    }

    struct BrokenScores;

    impl ScoreTable for BrokenScores {
        fn add(&self, _user_id: &str, _amount: u64) -> Result<u64, ScoreError> {
            Err(ScoreError::Poisoned)
        }
        fn get(&self, _user_id: &str) -> Result<u64, ScoreError> {
            Err(ScoreError::Poisoned)
        }
        fn top(&self, _n: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
            Err(ScoreError::Poisoned)
        }
        fn len(&self) -> Result<usize, ScoreError> {
            Err(ScoreError::Poisoned)
        }
    }

    #[test]
    fn score_failures_surface_as_errors() {
        let dispatcher = Dispatcher::new(Arc::new(single_item_store()), Arc::new(BrokenScores));
        assert!(matches!(
            dispatcher.dispatch("سؤال", "U1"),
            Err(DispatchError::Score(ScoreError::Poisoned))
        ));
        assert!(dispatcher.dispatch("نقاطي", "U1").is_err());
        assert!(dispatcher.dispatch("الصدارة", "U1").is_err());
        assert!(dispatcher.dispatch("مساعدة", "U1").unwrap().is_some());
    }
}
