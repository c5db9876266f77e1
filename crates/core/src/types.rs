//! Domain model shared by every adapter.
//!
//! These types represent OUR view of course content, not Moodle's raw
//! structures. Sections are opaque containers with no semantic meaning
//! (weekly vs topic vs general), and `ContentItem` unifies Moodle's
//! activity/resource distinction behind one `item_type` discriminator.
//!
//! All entities are loaded once at adapter construction and are read-only
//! afterwards; a fresh adapter instance is the only way to reload data.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Basic course metadata, without content structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub id: String,
    /// e.g. "COMP1001"
    pub code: String,
    /// e.g. "Introduction to Programming"
    pub name: String,
    pub instructor: String,
    /// e.g. "2024-25 Sem 1"
    pub semester: String,
}

/// Discriminator for content items.
///
/// Unrecognized tags deserialize to `Unknown` so new Moodle module types
/// never break loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    File,
    Url,
    Page,
    Assignment,
    Folder,
    Quiz,
    Forum,
    Book,
    Panopto,
    Video,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::File => "file",
            ItemType::Url => "url",
            ItemType::Page => "page",
            ItemType::Assignment => "assignment",
            ItemType::Folder => "folder",
            ItemType::Quiz => "quiz",
            ItemType::Forum => "forum",
            ItemType::Book => "book",
            ItemType::Panopto => "panopto",
            ItemType::Video => "video",
            ItemType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unified content item (activity OR resource).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique within an adapter instance
    pub id: String,
    pub name: String,
    pub item_type: ItemType,
    #[serde(default)]
    pub url: Option<String>,
    /// Pre-extracted text content (fixture data only)
    #[serde(default)]
    pub content: Option<String>,
    /// For files: "pdf", "docx", "pptx", ...
    #[serde(default)]
    pub file_type: Option<String>,
    /// For assignments and quizzes
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Flexible bag for type-specific extras
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    /// False if a teacher manually hid this item
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    /// Not available before this instant (open-ended if absent)
    #[serde(default)]
    pub available_from: Option<DateTime<Utc>>,
    /// Not available after this instant (open-ended if absent)
    #[serde(default)]
    pub available_until: Option<DateTime<Utc>>,
}

fn default_visible() -> bool {
    true
}

impl ContentItem {
    /// Create an item with just the required fields; everything else defaults.
    pub fn new(id: impl Into<String>, name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            item_type,
            url: None,
            content: None,
            file_type: None,
            due_date: None,
            metadata: HashMap::new(),
            is_visible: true,
            available_from: None,
            available_until: None,
        }
    }
}

/// A section within a course (opaque container).
///
/// Supports one level of subsections: depth 0 for sections, depth 1 for
/// subsections. The depth cap is a construction invariant, not validated
/// at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    /// HTML description (may be empty)
    #[serde(default)]
    pub summary: String,
    /// Zero-based order among siblings
    pub position: usize,
    /// 0 = section, 1 = subsection
    #[serde(default)]
    pub depth: u32,
    /// None for top-level sections
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub items: Vec<ContentItem>,
    #[serde(default)]
    pub subsections: Vec<Section>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub available_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub available_until: Option<DateTime<Utc>>,
}

/// Full structured content of a course: top-level sections only, with
/// subsections nested inside their parents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseContent {
    pub course_id: String,
    pub sections: Vec<Section>,
}

/// A search hit: the matched item, where it was found, and a bounded
/// excerpt of the matched text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub item: ContentItem,
    /// Which section the item came from
    pub section_name: String,
    pub snippet: String,
    /// 0.0 to 1.0
    pub relevance_score: f64,
}

/// Parse a lenient ISO 8601 datetime string.
///
/// Accepts a trailing `Z` as `+00:00`, offset-less timestamps (assumed
/// UTC), and bare dates (midnight UTC). An unparsable value logs a
/// warning and yields `None`; it never fails the surrounding load.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return None;
    }

    let normalized = match value.strip_suffix('Z') {
        Some(rest) => format!("{rest}+00:00"),
        None => value.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
    }

    tracing::warn!("invalid datetime format: {value}");
    None
}
