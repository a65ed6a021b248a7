//! Content resource files: parsing, auditing and sample generation
//!
//! Each category is read from `<stem>.txt` (one entry per line) or, when no
//! text file exists, from `<stem>.json`.

use crate::{builtin, ContentCategory, ContentError, ResourceFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PromptEntry {
    #[serde(alias = "prompt")]
    question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonResource {
    Strings(Vec<String>),
    Prompts(Vec<PromptEntry>),
    Named(BTreeMap<String, String>),
    Grouped(BTreeMap<String, Vec<String>>),
    Keyed(BTreeMap<String, serde_json::Value>),
}

/// Outcome of looking up a category inside a JSON object.
enum KeyedLookup<'a, V> {
    /// No key names a category: the object is sub-groups of one list.
    NotKeyed,
    Found(&'a V),
    Absent,
}

fn lookup_category<V>(map: &BTreeMap<String, V>, category: ContentCategory) -> KeyedLookup<'_, V> {
    if !map.keys().any(|key| key.parse::<ContentCategory>().is_ok()) {
        return KeyedLookup::NotKeyed;
    }
    map.iter()
        .find(|(key, _)| key.parse::<ContentCategory>().ok() == Some(category))
        .map(|(_, value)| KeyedLookup::Found(value))
        .unwrap_or(KeyedLookup::Absent)
}

pub(crate) fn render_prompt(question: &str, answer: Option<&str>, hint: Option<&str>) -> String {
    let mut out = question.trim().to_string();
    if let Some(hint) = hint.map(str::trim).filter(|value| !value.is_empty()) {
        out.push_str("\n\n💡 تلميح: ");
        out.push_str(hint);
    }
    if let Some(answer) = answer.map(str::trim).filter(|value| !value.is_empty()) {
        out.push_str("\n\n✅ الإجابة: ");
        out.push_str(answer);
    }
    out
}

pub(crate) fn render_named(name: &str, description: &str) -> String {
    format!("{}\n{}", name.trim(), description.trim())
}

fn parse_text(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn parse_json(
    path: &Path,
    category: ContentCategory,
    content: &str,
) -> Result<Vec<String>, ContentError> {
    let malformed = |reason: String| ContentError::Malformed {
        path: path.to_path_buf(),
        reason,
    };
    let resource: JsonResource =
        serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?;

    Ok(resource_entries(resource, category)
        .map_err(malformed)?
        .into_iter()
        .filter(|entry| !entry.is_empty())
        .collect())
}

/// Objects keyed by category name contribute only the matching key.
fn resource_entries(
    resource: JsonResource,
    category: ContentCategory,
) -> Result<Vec<String>, String> {
    let entries = match resource {
        JsonResource::Strings(items) => items
            .into_iter()
            .map(|item| item.trim().to_string())
            .collect(),
        JsonResource::Prompts(items) => items
            .iter()
            .map(|item| render_prompt(&item.question, item.answer.as_deref(), item.hint.as_deref()))
            .collect(),
        JsonResource::Named(items) => match lookup_category(&items, category) {
            KeyedLookup::NotKeyed => items
                .iter()
                .map(|(name, description)| render_named(name, description))
                .collect(),
            KeyedLookup::Found(item) => vec![item.trim().to_string()],
            KeyedLookup::Absent => Vec::new(),
        },
        JsonResource::Grouped(groups) => match lookup_category(&groups, category) {
            KeyedLookup::NotKeyed => groups
                .into_values()
                .flatten()
                .map(|item| item.trim().to_string())
                .collect(),
            KeyedLookup::Found(items) => items.iter().map(|item| item.trim().to_string()).collect(),
            KeyedLookup::Absent => Vec::new(),
        },
        JsonResource::Keyed(map) => match lookup_category(&map, category) {
            KeyedLookup::Found(value) => {
                let inner: JsonResource = serde_json::from_value(value.clone())
                    .map_err(|e| format!("'{}' entry: {}", category.stem(), e))?;
                resource_entries(inner, category)?
            }
            KeyedLookup::Absent => Vec::new(),
            KeyedLookup::NotKeyed => {
                return Err("object values must all be strings or all be lists".to_string())
            }
        },
    };
    Ok(entries)
}

fn resource_path(dir: &Path, category: ContentCategory, format: ResourceFormat) -> PathBuf {
    let extension = match format {
        ResourceFormat::Text => "txt",
        ResourceFormat::Json => "json",
    };
    dir.join(format!("{}.{}", category.stem(), extension))
}

/// Read one category's resource. `Ok(None)` when neither file exists.
pub(crate) fn read_resource(
    dir: &Path,
    category: ContentCategory,
) -> Result<Option<(PathBuf, Vec<String>)>, ContentError> {
    for format in [ResourceFormat::Text, ResourceFormat::Json] {
        let path = resource_path(dir, category, format);
        if !path.is_file() {
            continue;
        }
        let content = fs::read_to_string(&path).map_err(|source| ContentError::Io {
            path: path.clone(),
            source,
        })?;
        let entries = match format {
            ResourceFormat::Text => parse_text(&content),
            ResourceFormat::Json => parse_json(&path, category, &content)?,
        };
        return Ok(Some((path, entries)));
    }
    Ok(None)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceStatus {
    Present { path: PathBuf, entries: usize },
    Empty { path: PathBuf },
    Malformed { path: PathBuf, reason: String },
    Missing,
}

impl ResourceStatus {
    pub fn is_usable(&self) -> bool {
        matches!(self, ResourceStatus::Present { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ResourceReport {
    pub category: ContentCategory,
    pub status: ResourceStatus,
}

/// Inspect every expected resource in `dir` without loading it into a store.
pub fn audit(dir: &Path) -> Vec<ResourceReport> {
    ContentCategory::ALL
        .into_iter()
        .map(|category| {
            let status = match read_resource(dir, category) {
                Ok(Some((path, entries))) if entries.is_empty() => ResourceStatus::Empty { path },
                Ok(Some((path, entries))) => ResourceStatus::Present {
                    path,
                    entries: entries.len(),
                },
                Ok(None) => ResourceStatus::Missing,
                Err(ContentError::Malformed { path, reason }) => {
                    ResourceStatus::Malformed { path, reason }
                }
                Err(ContentError::Io { path, source }) => ResourceStatus::Malformed {
                    path,
                    reason: source.to_string(),
                },
                Err(other) => ResourceStatus::Malformed {
                    path: dir.to_path_buf(),
                    reason: other.to_string(),
                },
            };
            ResourceReport { category, status }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleOutcome {
    pub path: PathBuf,
    pub written: bool,
}

fn sample_body(category: ContentCategory) -> Result<String, ContentError> {
    let to_malformed = |e: serde_json::Error| ContentError::Malformed {
        path: PathBuf::from(category.stem()),
        reason: e.to_string(),
    };

    let body = match category {
        ContentCategory::Riddle => {
            let entries: Vec<PromptEntry> = builtin::RIDDLES
                .iter()
                .map(|(question, answer, hint)| PromptEntry {
                    question: question.to_string(),
                    answer: Some(answer.to_string()),
                    hint: Some(hint.to_string()),
                })
                .collect();
            serde_json::to_string_pretty(&entries).map_err(to_malformed)?
        }
        ContentCategory::PersonalityTrait => {
            let entries: BTreeMap<&str, &str> =
                builtin::PERSONALITY_TRAITS.iter().copied().collect();
            serde_json::to_string_pretty(&entries).map_err(to_malformed)?
        }
        _ => {
            let mut body = category.builtin().join("\n");
            body.push('\n');
            body
        }
    };
    Ok(body)
}

/// Write sample resource files for every category. Existing files are
/// left alone unless `force` is set.
pub fn write_samples(dir: &Path, force: bool) -> Result<Vec<SampleOutcome>, ContentError> {
    fs::create_dir_all(dir).map_err(|source| ContentError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut outcomes = Vec::with_capacity(ContentCategory::ALL.len());
    for category in ContentCategory::ALL {
        let path = resource_path(dir, category, category.sample_format());
        if path.exists() && !force {
            outcomes.push(SampleOutcome {
                path,
                written: false,
            });
            continue;
        }
        let body = sample_body(category)?;
        fs::write(&path, body).map_err(|source| ContentError::Io {
            path: path.clone(),
            source,
        })?;
        outcomes.push(SampleOutcome {
            path,
            written: true,
        });
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentStore;

    #[test]
    fn text_resource_skips_blank_and_comment_lines() {
        let entries = parse_text("# header\n\n  first  \nsecond\n   \n");
        assert_eq!(entries, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn json_accepts_plain_string_array() {
        let entries = parse_json(Path::new("q.json"), ContentCategory::Question, r#"["a", " b ", ""]"#).unwrap();
        assert_eq!(entries, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn json_prompt_objects_render_hint_and_answer() {
        let entries = parse_json(
            Path::new("riddles.json"),
            ContentCategory::Riddle,
            r#"[{"prompt": "ما هو؟", "answer": "القلم", "hint": "أداة"}, {"question": "سؤال فقط"}]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].starts_with("ما هو؟"));
        assert!(entries[0].contains("💡 تلميح: أداة"));
        assert!(entries[0].contains("✅ الإجابة: القلم"));
        assert_eq!(entries[1], "سؤال فقط");
    }

    #[test]
    fn json_object_keyed_by_group_is_flattened() {
        let entries = parse_json(
            Path::new("personality.json"),
            ContentCategory::PersonalityTrait,
            r#"{"a": ["one", "two"], "b": ["three"]}"#,
        )
        .unwrap();
        assert_eq!(entries, vec!["one", "two", "three"]);
    }

    #[test]
    fn json_named_object_joins_name_and_description() {
        let entries = parse_json(
            Path::new("personality.json"),
            ContentCategory::PersonalityTrait,
            r#"{"القائد": "يحب القيادة"}"#,
        )
        .unwrap();
        assert_eq!(entries, vec!["القائد\nيحب القيادة".to_string()]);
    }

    #[test]
    fn json_keyed_by_category_uses_only_the_matching_list() {
        let content = r#"{"questions": ["Q1"], "riddles": ["R1"], "challenges": ["C1"]}"#;
        let path = Path::new("questions.json");

        assert_eq!(
            parse_json(path, ContentCategory::Question, content).unwrap(),
            vec!["Q1".to_string()]
        );
        assert_eq!(
            parse_json(path, ContentCategory::Riddle, content).unwrap(),
            vec!["R1".to_string()]
        );
        assert!(parse_json(path, ContentCategory::Mention, content)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn json_keyed_by_arabic_keyword_with_mixed_shapes() {
        let content = r#"{
            "لغز": [{"question": "ما هو؟", "answer": "القلم"}],
            "تحليل": {"القائد": "يحب القيادة"},
            "سؤال": ["Q1", "Q2"]
        }"#;
        let path = Path::new("content.json");

        let riddles = parse_json(path, ContentCategory::Riddle, content).unwrap();
        assert_eq!(riddles.len(), 1);
        assert!(riddles[0].contains("✅ الإجابة: القلم"));

        let traits = parse_json(path, ContentCategory::PersonalityTrait, content).unwrap();
        assert_eq!(traits, vec!["القائد\nيحب القيادة".to_string()]);

        let questions = parse_json(path, ContentCategory::Question, content).unwrap();
        assert_eq!(questions, vec!["Q1".to_string(), "Q2".to_string()]);
    }

    #[test]
    fn category_keyed_file_does_not_leak_into_other_categories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("questions.json"),
            r#"{"questions": ["Q1"], "riddles": ["R1"], "challenges": ["C1"]}"#,
        )
        .unwrap();

        let store = ContentStore::load(Some(dir.path()));
        assert_eq!(store.list_for(ContentCategory::Question), ["Q1".to_string()]);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = parse_json(Path::new("bad.json"), ContentCategory::Question, "{not json").unwrap_err();
        assert!(matches!(err, ContentError::Malformed { .. }));
    }

    #[test]
    fn text_file_takes_precedence_over_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("questions.txt"), "from text\n").unwrap();
        fs::write(dir.path().join("questions.json"), r#"["from json"]"#).unwrap();

        let (path, entries) = read_resource(dir.path(), ContentCategory::Question)
            .unwrap()
            .unwrap();
        assert!(path.ends_with("questions.txt"));
        assert_eq!(entries, vec!["from text".to_string()]);
    }

    #[test]
    fn audit_reports_each_state() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("questions.txt"), "q1\nq2\n").unwrap();
        fs::write(dir.path().join("challenges.txt"), "\n# only a comment\n").unwrap();
        fs::write(dir.path().join("riddles.json"), "[1, 2").unwrap();

        let reports = audit(dir.path());
        assert_eq!(reports.len(), ContentCategory::ALL.len());

        let status_of = |category: ContentCategory| {
            reports
                .iter()
                .find(|report| report.category == category)
                .map(|report| report.status.clone())
                .unwrap()
        };

        assert!(matches!(
            status_of(ContentCategory::Question),
            ResourceStatus::Present { entries: 2, .. }
        ));
        assert!(matches!(
            status_of(ContentCategory::Challenge),
            ResourceStatus::Empty { .. }
        ));
        assert!(matches!(
            status_of(ContentCategory::Riddle),
            ResourceStatus::Malformed { .. }
        ));
        assert_eq!(status_of(ContentCategory::Mention), ResourceStatus::Missing);
    }

    #[test]
    fn load_falls_back_to_builtin_for_bad_resources() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("questions.txt"), "custom question\n").unwrap();
        fs::write(dir.path().join("challenges.txt"), "").unwrap();
        fs::write(dir.path().join("riddles.json"), "{broken").unwrap();

        let store = ContentStore::load(Some(dir.path()));
        assert_eq!(
            store.list_for(ContentCategory::Question),
            &["custom question".to_string()]
        );
        assert_eq!(
            store.list_for(ContentCategory::Challenge).len(),
            builtin::CHALLENGES.len()
        );
        assert_eq!(
            store.list_for(ContentCategory::Riddle).len(),
            builtin::RIDDLES.len()
        );
        assert!(store.empty_categories().is_empty());
    }

    #[test]
    fn samples_round_trip_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let outcomes = write_samples(dir.path(), false).unwrap();
        assert!(outcomes.iter().all(|outcome| outcome.written));
        assert!(dir.path().join("riddles.json").is_file());
        assert!(dir.path().join("personality.json").is_file());
        assert!(dir.path().join("questions.txt").is_file());

        assert!(audit(dir.path())
            .iter()
            .all(|report| report.status.is_usable()));

        let loaded = ContentStore::load(Some(dir.path()));
        let builtin = ContentStore::builtin();
        assert_eq!(
            loaded.list_for(ContentCategory::Question),
            builtin.list_for(ContentCategory::Question)
        );
        assert_eq!(
            loaded.list_for(ContentCategory::Riddle),
            builtin.list_for(ContentCategory::Riddle)
        );
        assert_eq!(
            loaded.list_for(ContentCategory::PersonalityTrait).len(),
            builtin::PERSONALITY_TRAITS.len()
        );
    }

    #[test]
    fn samples_do_not_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("questions.txt"), "keep me\n").unwrap();

        let outcomes = write_samples(dir.path(), false).unwrap();
        let questions = outcomes
            .iter()
            .find(|outcome| outcome.path.ends_with("questions.txt"))
            .unwrap();
        assert!(!questions.written);
        assert_eq!(
            fs::read_to_string(dir.path().join("questions.txt")).unwrap(),
            "keep me\n"
        );

        write_samples(dir.path(), true).unwrap();
        assert_ne!(
            fs::read_to_string(dir.path().join("questions.txt")).unwrap(),
            "keep me\n"
        );
    }
}
