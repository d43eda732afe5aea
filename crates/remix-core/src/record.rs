use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Source columns
// ---------------------------------------------------------------------------

pub const FIELD_ACTION_NAME: &str = "Action Name";
pub const FIELD_VISUAL_DESCRIPTION: &str = "Visual Description";
pub const FIELD_PROPS: &str = "Props";
pub const FIELD_DIFFICULTY: &str = "Difficulty";
pub const FIELD_ORIGIN_URL: &str = "Original Trope URL";
pub const FIELD_MJ_PROMPT: &str = "MJ Prompt";
pub const FIELD_EMOTION: &str = "Emotion";

pub const DEFAULT_ACTION_NAME: &str = "未知动作";
pub const DEFAULT_VISUAL_DESCRIPTION: &str = "无描述";
pub const DEFAULT_PROPS: &str = "无道具";
pub const DEFAULT_DIFFICULTY: &str = "Low";
pub const DEFAULT_ORIGIN_URL: &str = "#";
pub const DEFAULT_MJ_PROMPT: &str = "无画面提示";

// ---------------------------------------------------------------------------
// ActionRecord
// ---------------------------------------------------------------------------

/// One catalogued gesture / shot template, normalized to the fixed field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The store's own row id. Carried for display only.
    pub id: String,
    pub name: String,
    pub visual_description: String,
    pub props: String,
    pub difficulty: String,
    pub origin_url: String,
    pub mj_prompt: String,
    #[serde(default)]
    pub emotions: Vec<String>,
}

impl ActionRecord {
    /// Build a record from a store row's field map, applying the per-field
    /// defaults for absent or `null` cells.
    pub fn from_fields(id: impl Into<String>, fields: &Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            name: text_field(fields, FIELD_ACTION_NAME, DEFAULT_ACTION_NAME),
            visual_description: text_field(
                fields,
                FIELD_VISUAL_DESCRIPTION,
                DEFAULT_VISUAL_DESCRIPTION,
            ),
            props: text_field(fields, FIELD_PROPS, DEFAULT_PROPS),
            difficulty: text_field(fields, FIELD_DIFFICULTY, DEFAULT_DIFFICULTY),
            origin_url: url_field(fields, FIELD_ORIGIN_URL),
            mj_prompt: text_field(fields, FIELD_MJ_PROMPT, DEFAULT_MJ_PROMPT),
            emotions: list_field(fields, FIELD_EMOTION),
        }
    }

    /// A record with every field at its default. Handy as a test fixture base.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self::from_fields(id, &Map::new())
    }

    /// Emotion tags joined for display; empty string when untagged.
    pub fn emotion_tags(&self) -> String {
        self.emotions.join(", ")
    }
}

fn text_field(fields: &Map<String, Value>, key: &str, default: &str) -> String {
    fields
        .get(key)
        .and_then(value_to_text)
        .unwrap_or_else(|| default.to_string())
}

/// Only absolute http(s) links survive; anything else becomes the placeholder,
/// since the page renders this value as a clickable link.
fn url_field(fields: &Map<String, Value>, key: &str) -> String {
    let url = text_field(fields, key, DEFAULT_ORIGIN_URL);
    let trimmed = url.trim();
    let scheme = trimmed.split_once("://").map(|(scheme, _)| scheme);
    match scheme {
        Some(s) if s.eq_ignore_ascii_case("http") || s.eq_ignore_ascii_case("https") => {
            trimmed.to_string()
        }
        _ => DEFAULT_ORIGIN_URL.to_string(),
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Multi-select and lookup cells arrive as arrays.
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(value_to_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(obj) => obj
            .get("name")
            .or_else(|| obj.get("url"))
            .and_then(value_to_text),
    }
}

fn list_field(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(value_to_text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split([',', '，', '、'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Immutable, ordered snapshot of every record fetched from the store.
///
/// Cloning shares the same snapshot.
#[derive(Debug, Clone)]
pub struct Table {
    records: Arc<[ActionRecord]>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Table {
    pub fn new(records: Vec<ActionRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActionRecord> {
        self.records.iter()
    }

    /// True when both handles point at the same fetched snapshot.
    #[cfg(test)]
    pub(crate) fn same_snapshot(&self, other: &Table) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}

impl FromIterator<ActionRecord> for Table {
    fn from_iter<I: IntoIterator<Item = ActionRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a ActionRecord;
    type IntoIter = std::slice::Iter<'a, ActionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
