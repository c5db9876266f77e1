//! Fixture-backed adapter loading course data from JSON scenarios.
//!
//! Scenario layout under the stubs root:
//!
//! ```text
//! data/stubs/<scenario>/
//! ├── course_info.json
//! ├── course_content.json
//! └── item_contents/
//!     ├── item_001.txt
//!     └── item_002.txt
//! ```
//!
//! Everything is loaded once at construction into in-memory caches;
//! development and testing proceed without real Moodle access.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::port::CoursePort;
use lectern_core::types::{ContentItem, CourseContent, CourseInfo, ItemType, SearchResult, Section, parse_datetime};
use lectern_core::{Error, Result, SectionWalk, search_course};

/// Scenario used when the requested one does not exist.
pub const DEFAULT_SCENARIO: &str = "demo_course";

/// Stub implementation of [`CoursePort`].
#[derive(Debug)]
pub struct StubAdapter {
    scenario: String,
    course_info_cache: HashMap<String, CourseInfo>,
    course_content_cache: HashMap<String, CourseContent>,
    item_contents: HashMap<String, String>,
}

impl StubAdapter {
    /// Load the named scenario from `stubs_root`.
    ///
    /// A missing scenario directory falls back to [`DEFAULT_SCENARIO`],
    /// with a warning; this is policy, not an error. Malformed JSON in an
    /// existing fixture file does propagate.
    pub fn new(stubs_root: impl AsRef<Path>, scenario: &str) -> Result<Self> {
        let mut data_path = stubs_root.as_ref().join(scenario);
        let mut scenario = scenario.to_string();

        if !data_path.exists() {
            warn!("stub scenario not found: {scenario}, using {DEFAULT_SCENARIO}");
            data_path = stubs_root.as_ref().join(DEFAULT_SCENARIO);
            scenario = DEFAULT_SCENARIO.to_string();
        }

        let mut adapter = Self {
            scenario,
            course_info_cache: HashMap::new(),
            course_content_cache: HashMap::new(),
            item_contents: HashMap::new(),
        };
        adapter.load_stub_data(&data_path)?;
        Ok(adapter)
    }

    /// Name of the scenario actually loaded (after any fallback).
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    fn load_stub_data(&mut self, data_path: &Path) -> Result<()> {
        debug!("loading stub data from: {}", data_path.display());

        let course_info_path = data_path.join("course_info.json");
        if course_info_path.exists() {
            let course_info: CourseInfo = serde_json::from_str(&fs::read_to_string(&course_info_path)?)?;
            debug!("loaded course info: {}", course_info.id);
            self.course_info_cache.insert(course_info.id.clone(), course_info);
        }

        let course_content_path = data_path.join("course_content.json");
        if course_content_path.exists() {
            let raw: RawCourseContent = serde_json::from_str(&fs::read_to_string(&course_content_path)?)?;
            let content = parse_course_content(raw);
            debug!("loaded course content: {}", content.course_id);
            self.course_content_cache.insert(content.course_id.clone(), content);
        }

        let item_contents_path = data_path.join("item_contents");
        if item_contents_path.exists() {
            for entry in fs::read_dir(&item_contents_path)? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                    continue;
                }
                if let Some(item_id) = path.file_stem().and_then(|s| s.to_str()) {
                    self.item_contents.insert(item_id.to_string(), fs::read_to_string(&path)?);
                }
            }
            debug!("loaded {} item contents", self.item_contents.len());
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl CoursePort for StubAdapter {
    async fn get_course_info(&self, course_id: &str) -> Result<CourseInfo> {
        self.course_info_cache
            .get(course_id)
            .cloned()
            .ok_or_else(|| Error::course_not_found(course_id))
    }

    async fn get_course_content(&self, course_id: &str) -> Result<CourseContent> {
        self.course_content_cache
            .get(course_id)
            .cloned()
            .ok_or_else(|| Error::course_not_found(course_id))
    }

    async fn get_item_content(&self, item_id: &str) -> Result<String> {
        self.item_contents
            .get(item_id)
            .cloned()
            .ok_or_else(|| Error::item_not_found(item_id))
    }

    async fn search(&self, query: &str, course_id: &str) -> Result<Vec<SearchResult>> {
        let content = self
            .course_content_cache
            .get(course_id)
            .ok_or_else(|| Error::course_not_found(course_id))?;

        search_course(content, query, SectionWalk::Recursive, |item| {
            Ok(self.item_contents.get(&item.id).cloned())
        })
    }
}

/// Raw JSON shapes; datetimes stay strings until the lenient parse.
#[derive(Debug, Deserialize)]
struct RawCourseContent {
    course_id: String,
    #[serde(default)]
    sections: Vec<RawSection>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    id: String,
    name: String,
    #[serde(default)]
    summary: String,
    position: usize,
    #[serde(default)]
    depth: u32,
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    items: Vec<RawItem>,
    #[serde(default)]
    subsections: Vec<RawSection>,
    #[serde(default = "default_visible")]
    is_visible: bool,
    #[serde(default)]
    available_from: Option<String>,
    #[serde(default)]
    available_until: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    id: String,
    name: String,
    item_type: ItemType,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    file_type: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    metadata: HashMap<String, serde_json::Value>,
    #[serde(default = "default_visible")]
    is_visible: bool,
    #[serde(default)]
    available_from: Option<String>,
    #[serde(default)]
    available_until: Option<String>,
}

fn default_visible() -> bool {
    true
}

fn optional_datetime(value: Option<&str>) -> Option<DateTime<Utc>> {
    value.and_then(parse_datetime)
}

fn parse_course_content(raw: RawCourseContent) -> CourseContent {
    let sections = raw.sections.into_iter().map(|s| parse_section(s, 0)).collect();
    CourseContent { course_id: raw.course_id, sections }
}

/// Recursively parse a section tree.
///
/// The data model caps meaningful depth at 1 but the fixture format does
/// not enforce it; deeper nesting still loads, with a warning.
fn parse_section(raw: RawSection, level: u32) -> Section {
    if level > 1 {
        warn!("section {} nested beyond depth 1 (level {level})", raw.id);
    }

    let items = raw.items.into_iter().map(parse_content_item).collect();
    let subsections = raw.subsections.into_iter().map(|s| parse_section(s, level + 1)).collect();

    Section {
        id: raw.id,
        name: raw.name,
        summary: raw.summary,
        position: raw.position,
        depth: raw.depth,
        parent_id: raw.parent_id,
        items,
        subsections,
        is_visible: raw.is_visible,
        available_from: optional_datetime(raw.available_from.as_deref()),
        available_until: optional_datetime(raw.available_until.as_deref()),
    }
}

fn parse_content_item(raw: RawItem) -> ContentItem {
    ContentItem {
        id: raw.id,
        name: raw.name,
        item_type: raw.item_type,
        url: raw.url,
        content: raw.content,
        file_type: raw.file_type,
        due_date: optional_datetime(raw.due_date.as_deref()),
        metadata: raw.metadata,
        is_visible: raw.is_visible,
        available_from: optional_datetime(raw.available_from.as_deref()),
        available_until: optional_datetime(raw.available_until.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_scenario(root: &Path, scenario: &str) {
        let dir = root.join(scenario);
        fs::create_dir_all(dir.join("item_contents")).unwrap();

        fs::write(
            dir.join("course_info.json"),
            r#"{
                "id": "COMP1001-2024",
                "code": "COMP1001",
                "name": "Introduction to Programming",
                "instructor": "Dr. Ada Chan",
                "semester": "2024-25 Sem 1"
            }"#,
        )
        .unwrap();

        fs::write(
            dir.join("course_content.json"),
            r#"{
                "course_id": "COMP1001-2024",
                "sections": [
                    {
                        "id": "sec_1",
                        "name": "Week 1",
                        "summary": "<p>Getting started</p>",
                        "position": 0,
                        "items": [
                            {"id": "item_001", "name": "Course Syllabus", "item_type": "page"},
                            {
                                "id": "item_002",
                                "name": "Assignment 1",
                                "item_type": "assignment",
                                "due_date": "2024-09-30T23:59:00Z"
                            }
                        ],
                        "subsections": [
                            {
                                "id": "sec_1_1",
                                "name": "Readings",
                                "position": 0,
                                "depth": 1,
                                "parent_id": "sec_1",
                                "items": [
                                    {"id": "item_003", "name": "Chapter 1 Notes", "item_type": "file", "file_type": "pdf"}
                                ]
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        fs::write(
            dir.join("item_contents").join("item_001.txt"),
            "Welcome to COMP1001. Topics include variables, loops and recursion.",
        )
        .unwrap();
        fs::write(
            dir.join("item_contents").join("item_003.txt"),
            "Chapter 1 covers the history of computing machines.",
        )
        .unwrap();
    }

    fn adapter(root: &Path, scenario: &str) -> StubAdapter {
        StubAdapter::new(root, scenario).unwrap()
    }

    #[tokio::test]
    async fn test_get_course_info() {
        let temp = TempDir::new().unwrap();
        write_scenario(temp.path(), "demo_course");

        let stub = adapter(temp.path(), "demo_course");
        let info = stub.get_course_info("COMP1001-2024").await.unwrap();
        assert_eq!(info.id, "COMP1001-2024");
        assert_eq!(info.code, "COMP1001");
        assert_eq!(info.instructor, "Dr. Ada Chan");
    }

    #[tokio::test]
    async fn test_unknown_course_errors() {
        let temp = TempDir::new().unwrap();
        write_scenario(temp.path(), "demo_course");

        let stub = adapter(temp.path(), "demo_course");
        let err = stub.get_course_info("MISSING").await.unwrap_err();
        assert!(matches!(err, Error::CourseNotFound { .. }));
        let err = stub.get_course_content("MISSING").await.unwrap_err();
        assert!(matches!(err, Error::CourseNotFound { .. }));
        let err = stub.search("anything", "MISSING").await.unwrap_err();
        assert!(matches!(err, Error::CourseNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_scenario_falls_back_to_default() {
        let temp = TempDir::new().unwrap();
        write_scenario(temp.path(), "demo_course");

        let stub = adapter(temp.path(), "no_such_scenario");
        assert_eq!(stub.scenario(), DEFAULT_SCENARIO);
        assert!(stub.get_course_info("COMP1001-2024").await.is_ok());
    }

    #[tokio::test]
    async fn test_subsections_are_nested_not_flattened() {
        let temp = TempDir::new().unwrap();
        write_scenario(temp.path(), "demo_course");

        let stub = adapter(temp.path(), "demo_course");
        let content = stub.get_course_content("COMP1001-2024").await.unwrap();
        assert_eq!(content.sections.len(), 1);
        assert_eq!(content.sections[0].subsections.len(), 1);
        let sub = &content.sections[0].subsections[0];
        assert_eq!(sub.depth, 1);
        assert_eq!(sub.parent_id.as_deref(), Some("sec_1"));
        assert_eq!(sub.items[0].item_type, ItemType::File);
    }

    #[tokio::test]
    async fn test_due_date_parsed() {
        let temp = TempDir::new().unwrap();
        write_scenario(temp.path(), "demo_course");

        let stub = adapter(temp.path(), "demo_course");
        let content = stub.get_course_content("COMP1001-2024").await.unwrap();
        let assignment = &content.sections[0].items[1];
        assert_eq!(
            assignment.due_date,
            parse_datetime("2024-09-30T23:59:00+00:00")
        );
    }

    #[tokio::test]
    async fn test_item_content_lookup() {
        let temp = TempDir::new().unwrap();
        write_scenario(temp.path(), "demo_course");

        let stub = adapter(temp.path(), "demo_course");
        let body = stub.get_item_content("item_001").await.unwrap();
        assert!(body.contains("recursion"));

        let err = stub.get_item_content("item_999").await.unwrap_err();
        assert!(matches!(err, Error::ItemNotFound { .. }));
    }

    #[tokio::test]
    async fn test_search_covers_subsections() {
        let temp = TempDir::new().unwrap();
        write_scenario(temp.path(), "demo_course");

        let stub = adapter(temp.path(), "demo_course");
        let results = stub.search("chapter 1", "COMP1001-2024").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].item.id, "item_003");
        assert_eq!(results[0].section_name, "Readings");
        assert_eq!(results[0].relevance_score, 0.8);
    }

    #[tokio::test]
    async fn test_search_content_match_scores_lower() {
        let temp = TempDir::new().unwrap();
        write_scenario(temp.path(), "demo_course");

        let stub = adapter(temp.path(), "demo_course");
        // "recursion" appears only in item_001's body; "syllabus" in its name
        let results = stub.search("recursion", "COMP1001-2024").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].relevance_score, 0.6);
        assert!(results[0].snippet.contains("recursion"));
    }

    #[tokio::test]
    async fn test_malformed_content_json_propagates() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("demo_course");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("course_content.json"), "{ not json").unwrap();

        let result = StubAdapter::new(temp.path(), "demo_course");
        assert!(matches!(result.unwrap_err(), Error::Parse(_)));
    }

    #[tokio::test]
    async fn test_reads_are_idempotent() {
        let temp = TempDir::new().unwrap();
        write_scenario(temp.path(), "demo_course");

        let stub = adapter(temp.path(), "demo_course");
        let first = stub.get_course_content("COMP1001-2024").await.unwrap();
        let second = stub.get_course_content("COMP1001-2024").await.unwrap();
        assert_eq!(first, second);

        let s1 = stub.search("chapter", "COMP1001-2024").await.unwrap();
        let s2 = stub.search("chapter", "COMP1001-2024").await.unwrap();
        assert_eq!(s1, s2);
    }
}
