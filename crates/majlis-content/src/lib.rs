//! Majlis Content Store
//!
//! Immutable reply content grouped by category, loaded once at startup
//! from resource files with built-in fallbacks

mod builtin;
pub mod resources;

use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub use resources::{audit, write_samples, ResourceReport, ResourceStatus, SampleOutcome};

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content category '{0}' is empty")]
    EmptyCategory(ContentCategory),
    #[error("unknown content category '{0}'")]
    UnknownCategory(String),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed resource {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentCategory {
    Question,
    Challenge,
    Mention,
    Confession,
    Situation,
    Riddle,
    PersonalityTrait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFormat {
    Text,
    Json,
}

impl ContentCategory {
    pub const ALL: [ContentCategory; 7] = [
        ContentCategory::Question,
        ContentCategory::Challenge,
        ContentCategory::Mention,
        ContentCategory::Confession,
        ContentCategory::Situation,
        ContentCategory::Riddle,
        ContentCategory::PersonalityTrait,
    ];

    /// Resource file stem, also accepted on the command line.
    pub fn stem(self) -> &'static str {
        match self {
            ContentCategory::Question => "questions",
            ContentCategory::Challenge => "challenges",
            ContentCategory::Mention => "mentions",
            ContentCategory::Confession => "confessions",
            ContentCategory::Situation => "situations",
            ContentCategory::Riddle => "riddles",
            ContentCategory::PersonalityTrait => "personality",
        }
    }

    /// Chat keyword that draws from this category.
    pub fn keyword(self) -> &'static str {
        match self {
            ContentCategory::Question => "سؤال",
            ContentCategory::Challenge => "تحدي",
            ContentCategory::Mention => "منشن",
            ContentCategory::Confession => "اعتراف",
            ContentCategory::Situation => "موقف",
            ContentCategory::Riddle => "لغز",
            ContentCategory::PersonalityTrait => "تحليل",
        }
    }

    /// Format used by `write_samples`; loading accepts either format.
    pub fn sample_format(self) -> ResourceFormat {
        match self {
            ContentCategory::Riddle | ContentCategory::PersonalityTrait => ResourceFormat::Json,
            _ => ResourceFormat::Text,
        }
    }

    fn builtin(self) -> Vec<String> {
        match self {
            ContentCategory::Question => to_owned_list(builtin::QUESTIONS),
            ContentCategory::Challenge => to_owned_list(builtin::CHALLENGES),
            ContentCategory::Mention => to_owned_list(builtin::MENTIONS),
            ContentCategory::Confession => to_owned_list(builtin::CONFESSIONS),
            ContentCategory::Situation => to_owned_list(builtin::SITUATIONS),
            ContentCategory::Riddle => builtin::RIDDLES
                .iter()
                .map(|&(question, answer, hint)| {
                    resources::render_prompt(question, Some(answer), Some(hint))
                })
                .collect(),
            ContentCategory::PersonalityTrait => builtin::PERSONALITY_TRAITS
                .iter()
                .map(|&(name, description)| resources::render_named(name, description))
                .collect(),
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}

impl std::str::FromStr for ContentCategory {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ContentCategory::ALL
            .into_iter()
            .find(|category| {
                category.stem().eq_ignore_ascii_case(needle) || category.keyword() == needle
            })
            .ok_or_else(|| ContentError::UnknownCategory(needle.to_string()))
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[derive(Debug, Clone)]
pub struct ContentStore {
    lists: HashMap<ContentCategory, Vec<String>>,
}

impl ContentStore {
    pub fn builtin() -> Self {
        let lists = ContentCategory::ALL
            .into_iter()
            .map(|category| (category, category.builtin()))
            .collect();
        Self { lists }
    }

    /// Build a store from explicit lists. Categories left out are empty.
    pub fn from_lists(lists: HashMap<ContentCategory, Vec<String>>) -> Self {
        Self { lists }
    }

    /// Load every category from `dir`, falling back to built-in content for
    /// any resource that is missing, malformed or empty.
    pub fn load(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            info!("No content directory configured, using built-in content");
            return Self::builtin();
        };
        if !dir.is_dir() {
            warn!(
                "Content directory {} does not exist, using built-in content",
                dir.display()
            );
            return Self::builtin();
        }

        let mut lists = HashMap::new();
        for category in ContentCategory::ALL {
            let entries = match resources::read_resource(dir, category) {
                Ok(Some((path, entries))) if !entries.is_empty() => {
                    info!(
                        category = %category,
                        entries = entries.len(),
                        "Loaded content from {}",
                        path.display()
                    );
                    entries
                }
                Ok(Some((path, _))) => {
                    warn!(
                        category = %category,
                        "Content resource {} is empty, using built-in content",
                        path.display()
                    );
                    category.builtin()
                }
                Ok(None) => {
                    debug!(category = %category, "No content resource found, using built-in content");
                    category.builtin()
                }
                Err(e) => {
                    warn!(category = %category, "{}, using built-in content", e);
                    category.builtin()
                }
            };
            lists.insert(category, entries);
        }

        Self { lists }
    }

    pub fn list_for(&self, category: ContentCategory) -> &[String] {
        self.lists
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Uniform pick from the category's list.
    pub fn random_from(&self, category: ContentCategory) -> Result<&str, ContentError> {
        self.list_for(category)
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .ok_or(ContentError::EmptyCategory(category))
    }

    pub fn empty_categories(&self) -> Vec<ContentCategory> {
        ContentCategory::ALL
            .into_iter()
            .filter(|category| self.list_for(*category).is_empty())
            .collect()
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_store_has_every_category() {
        let store = ContentStore::builtin();
        assert!(store.empty_categories().is_empty());
        for category in ContentCategory::ALL {
            assert!(!store.list_for(category).is_empty(), "{} is empty", category);
        }
    }

    #[test]
    fn random_from_returns_member_of_list() {
        let store = ContentStore::builtin();
        for category in ContentCategory::ALL {
            for _ in 0..20 {
                let picked = store.random_from(category).expect("non-empty");
                assert!(store.list_for(category).iter().any(|item| item == picked));
            }
        }
    }

    #[test]
    fn random_from_eventually_covers_small_list() {
        let store = ContentStore::from_lists(HashMap::from([(
            ContentCategory::Question,
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        )]));
        let mut seen = HashSet::new();
        for _ in 0..500 {
            seen.insert(store.random_from(ContentCategory::Question).expect("pick"));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn missing_content_dir_uses_builtin_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::load(Some(&dir.path().join("no-such-dir")));
        let builtin = ContentStore::builtin();
        for category in ContentCategory::ALL {
            assert_eq!(store.list_for(category), builtin.list_for(category));
        }
    }

    #[test]
    fn random_from_empty_category_is_an_error() {
        let store = ContentStore::from_lists(HashMap::new());
        let err = store.random_from(ContentCategory::Riddle).unwrap_err();
        assert!(matches!(
            err,
            ContentError::EmptyCategory(ContentCategory::Riddle)
        ));
        assert_eq!(store.empty_categories().len(), ContentCategory::ALL.len());
    }

    #[test]
    fn category_parses_from_stem_or_keyword() {
        assert_eq!(
            "questions".parse::<ContentCategory>().unwrap(),
            ContentCategory::Question
        );
        assert_eq!(
            "RIDDLES".parse::<ContentCategory>().unwrap(),
            ContentCategory::Riddle
        );
        assert_eq!(
            "تحليل".parse::<ContentCategory>().unwrap(),
            ContentCategory::PersonalityTrait
        );
        assert!("jokes".parse::<ContentCategory>().is_err());
    }

    #[test]
    fn builtin_riddles_render_hint_and_answer() {
        let store = ContentStore::builtin();
        let riddle = &store.list_for(ContentCategory::Riddle)[0];
        assert!(riddle.contains("💡"));
        assert!(riddle.contains("✅"));
    }

    #[test]
    fn load_without_directory_uses_builtin() {
        let store = ContentStore::load(None);
        assert_eq!(
            store.list_for(ContentCategory::Question).len(),
            builtin::QUESTIONS.len()
        );
    }
}
