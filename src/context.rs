use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Context key holding the alert strings raised for a patient visit
pub const PATIENT_VISIT_ALERTS: &str = "patient_visit_alerts";

/// Context key holding every photo submitted with a patient visit
pub const PATIENT_VISIT_PHOTOS: &str = "patient_visit_photos";

/// `"<tag>:question_summary"`
pub fn question_summary_key(question_tag: &str) -> String {
    format!("{}:question_summary", question_tag)
}

/// `"<tag>:answers"`
pub fn answers_key(question_tag: &str) -> String {
    format!("{}:answers", question_tag)
}

/// `"<key>:empty_state_text"`
pub fn empty_state_text_key(key: &str) -> String {
    format!("{}:empty_state_text", key)
}

/// A potential answer and whether the patient selected it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckedItem {
    pub value: String,
    #[serde(default)]
    pub is_checked: bool,
}

impl CheckedItem {
    pub fn new(value: impl Into<String>, is_checked: bool) -> Self {
        Self {
            value: value.into(),
            is_checked,
        }
    }
}

/// An answer with a subtitle and nested sub-answers (e.g. a medication and its dosage details)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleSubtitleSubItems {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub subitems: Vec<String>,
}

/// A patient photo slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub title: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub placeholder_url: String,
}

/// Every shape of content a view can bind to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ContentValue {
    String(String),
    StringList(Vec<String>),
    CheckedItems(Vec<CheckedItem>),
    TitleSubtitleSubItems(Vec<TitleSubtitleSubItems>),
    Photos(Vec<Photo>),
}

impl ContentValue {
    /// Human-readable name of the shape, used in type mismatch errors
    pub fn shape_name(&self) -> &'static str {
        match self {
            ContentValue::String(_) => "string",
            ContentValue::StringList(_) => "list of strings",
            ContentValue::CheckedItems(_) => "list of checked items",
            ContentValue::TitleSubtitleSubItems(_) => "list of title/subtitle/subitems",
            ContentValue::Photos(_) => "list of photos",
        }
    }
}

impl From<String> for ContentValue {
    fn from(value: String) -> Self {
        ContentValue::String(value)
    }
}

impl From<&str> for ContentValue {
    fn from(value: &str) -> Self {
        ContentValue::String(value.to_string())
    }
}

impl From<Vec<String>> for ContentValue {
    fn from(value: Vec<String>) -> Self {
        ContentValue::StringList(value)
    }
}

impl From<Vec<&str>> for ContentValue {
    fn from(value: Vec<&str>) -> Self {
        ContentValue::StringList(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<CheckedItem>> for ContentValue {
    fn from(value: Vec<CheckedItem>) -> Self {
        ContentValue::CheckedItems(value)
    }
}

impl From<Vec<TitleSubtitleSubItems>> for ContentValue {
    fn from(value: Vec<TitleSubtitleSubItems>) -> Self {
        ContentValue::TitleSubtitleSubItems(value)
    }
}

impl From<Vec<Photo>> for ContentValue {
    fn from(value: Vec<Photo>) -> Self {
        ContentValue::Photos(value)
    }
}

/// Per-render key/value store supplying runtime content to views.
///
/// Populated fully by the caller before rendering and dropped afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewContext {
    values: HashMap<String, ContentValue>,
}

impl ViewContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ContentValue> {
        self.values.get(key)
    }

    /// Insert or replace the content stored under `key`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ContentValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn delete(&mut self, key: &str) -> Option<ContentValue> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
