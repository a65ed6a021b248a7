//! Fixed chat command vocabulary
//!
//! Matching is exact and case-sensitive on the trimmed message text.

use majlis_content::ContentCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    Help,
    Content(ContentCategory),
    Analysis,
    MyPoints,
    Leaderboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub keyword: &'static str,
    /// Button label in the help menu.
    pub label: &'static str,
    pub action: CommandAction,
    /// Points awarded once the reply is produced; 0 means no score mutation.
    pub points: u64,
}

const STANDARD_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        keyword: "مساعدة",
        label: "📋 مساعدة",
        action: CommandAction::Help,
        points: 0,
    },
    CommandSpec {
        keyword: "سؤال",
        label: "❓ سؤال",
        action: CommandAction::Content(ContentCategory::Question),
        points: 1,
    },
    CommandSpec {
        keyword: "تحدي",
        label: "🎯 تحدي",
        action: CommandAction::Content(ContentCategory::Challenge),
        points: 1,
    },
    CommandSpec {
        keyword: "منشن",
        label: "📣 منشن",
        action: CommandAction::Content(ContentCategory::Mention),
        points: 1,
    },
    CommandSpec {
        keyword: "اعتراف",
        label: "🤫 اعتراف",
        action: CommandAction::Content(ContentCategory::Confession),
        points: 1,
    },
    CommandSpec {
        keyword: "موقف",
        label: "🎭 موقف",
        action: CommandAction::Content(ContentCategory::Situation),
        points: 1,
    },
    CommandSpec {
        keyword: "لغز",
        label: "🧩 لغز",
        action: CommandAction::Content(ContentCategory::Riddle),
        points: 1,
    },
    CommandSpec {
        keyword: "تحليل",
        label: "🔮 تحليل",
        action: CommandAction::Analysis,
        points: 2,
    },
    CommandSpec {
        keyword: "نقاطي",
        label: "⭐ نقاطي",
        action: CommandAction::MyPoints,
        points: 0,
    },
    CommandSpec {
        keyword: "الصدارة",
        label: "🏆 الصدارة",
        action: CommandAction::Leaderboard,
        points: 0,
    },
];

#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: &'static [CommandSpec],
}

impl CommandTable {
    pub fn standard() -> Self {
        Self {
            commands: STANDARD_COMMANDS,
        }
    }

    pub fn lookup(&self, text: &str) -> Option<&'static CommandSpec> {
        let text = text.trim();
        self.commands.iter().find(|spec| spec.keyword == text)
    }

    pub fn commands(&self) -> &'static [CommandSpec] {
        self.commands
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::standard()
    }
}
