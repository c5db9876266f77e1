//! Filesystem adapter scanning a local mirror of course materials.
//!
//! Directory structure:
//!
//! ```text
//! courses_path/
//! ├── COMP1001/
//! │   ├── _meta.yaml           # course metadata (required)
//! │   ├── week01/
//! │   │   ├── _section.yaml    # section metadata (optional)
//! │   │   ├── lecture_slides.pdf
//! │   │   ├── lecture_slides.txt   # pre-extracted text companion
//! │   │   └── lab_instructions.md
//! │   └── week02/
//! └── COMP2001/
//! ```
//!
//! Sections and files are processed in lexical sort order; item ids are
//! synthetic (`file_item_<n>`) from a per-course counter that keeps
//! increasing across sections. A course directory without `_meta.yaml` is
//! skipped with a warning and contributes nothing to the catalogue.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::port::CoursePort;
use lectern_core::types::{ContentItem, CourseContent, CourseInfo, ItemType, SearchResult, Section, parse_datetime};
use lectern_core::{Error, Result, SectionWalk, search_course};

/// File extensions read directly as item bodies.
const TEXT_SUFFIXES: &[&str] = &["txt", "md", "html"];

/// Filesystem implementation of [`CoursePort`].
pub struct FileAdapter {
    course_info_cache: HashMap<String, CourseInfo>,
    course_content_cache: HashMap<String, CourseContent>,
    item_registry: HashMap<String, PathBuf>,
}

impl FileAdapter {
    /// Scan `courses_path` and build the in-memory catalogue.
    ///
    /// A missing root yields an empty catalogue with a warning. Courses
    /// with missing or unparsable `_meta.yaml` are skipped individually.
    pub fn new(courses_path: impl AsRef<Path>) -> Result<Self> {
        let mut adapter = Self {
            course_info_cache: HashMap::new(),
            course_content_cache: HashMap::new(),
            item_registry: HashMap::new(),
        };
        adapter.scan_courses(courses_path.as_ref())?;
        Ok(adapter)
    }

    /// Course ids currently in the catalogue.
    pub fn course_ids(&self) -> Vec<String> {
        self.course_info_cache.keys().cloned().collect()
    }

    fn scan_courses(&mut self, courses_path: &Path) -> Result<()> {
        if !courses_path.exists() {
            warn!("courses path not found: {}", courses_path.display());
            return Ok(());
        }

        for course_dir in sorted_entries(courses_path)? {
            if !course_dir.is_dir() || is_hidden(&course_dir) {
                continue;
            }
            self.load_course(&course_dir)?;
        }

        Ok(())
    }

    fn load_course(&mut self, course_dir: &Path) -> Result<()> {
        let meta_path = course_dir.join("_meta.yaml");
        if !meta_path.exists() {
            warn!("missing _meta.yaml in {}", course_dir.display());
            return Ok(());
        }

        let dir_name = file_name(course_dir);
        let meta = match fs::read_to_string(&meta_path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_yml::from_str::<RawCourseMeta>(&text).map_err(|e| e.to_string()))
        {
            Ok(meta) => meta,
            Err(e) => {
                warn!("unreadable _meta.yaml in {}: {e}", course_dir.display());
                return Ok(());
            }
        };

        let course_info = CourseInfo {
            id: meta.id.unwrap_or_else(|| dir_name.clone()),
            code: meta.code.unwrap_or_else(|| dir_name.clone()),
            name: meta.name.unwrap_or_else(|| dir_name.clone()),
            instructor: meta.instructor.unwrap_or_else(|| "Unknown".to_string()),
            semester: meta.semester.unwrap_or_else(|| "Unknown".to_string()),
        };
        let course_id = course_info.id.clone();
        self.course_info_cache.insert(course_id.clone(), course_info);

        let mut sections: Vec<Section> = Vec::new();
        let mut item_counter = 0usize;

        for section_dir in sorted_entries(course_dir)? {
            if !section_dir.is_dir() || is_hidden(&section_dir) {
                continue;
            }
            let (section, items_loaded) = self.load_section(&section_dir, sections.len(), item_counter)?;
            sections.push(section);
            item_counter += items_loaded;
        }

        debug!("loaded course: {course_id} with {} sections", sections.len());
        self.course_content_cache
            .insert(course_id.clone(), CourseContent { course_id, sections });

        Ok(())
    }

    fn load_section(&mut self, section_dir: &Path, position: usize, item_start: usize) -> Result<(Section, usize)> {
        let meta_path = section_dir.join("_section.yaml");
        let meta = if meta_path.exists() {
            match fs::read_to_string(&meta_path)
                .map_err(|e| e.to_string())
                .and_then(|text| {
                    if text.trim().is_empty() {
                        Ok(RawSectionMeta::default())
                    } else {
                        serde_yml::from_str::<RawSectionMeta>(&text).map_err(|e| e.to_string())
                    }
                }) {
                Ok(meta) => meta,
                Err(e) => {
                    warn!("unreadable _section.yaml in {}: {e}", section_dir.display());
                    RawSectionMeta::default()
                }
            }
        } else {
            RawSectionMeta::default()
        };

        let dir_name = file_name(section_dir);
        let section_id = meta.id.unwrap_or_else(|| format!("section_{dir_name}"));
        let section_name = meta
            .name
            .unwrap_or_else(|| title_case(&dir_name.replace('_', " ")));

        let mut items: Vec<ContentItem> = Vec::new();
        let mut item_counter = item_start;

        for file_path in sorted_entries(section_dir)? {
            if file_path.is_dir() || is_hidden(&file_path) {
                continue;
            }
            if matches!(suffix(&file_path).as_deref(), Some("yaml") | Some("yml")) {
                continue;
            }

            if let Some(item) = file_to_content_item(&file_path, item_counter) {
                self.item_registry.insert(item.id.clone(), file_path);
                items.push(item);
                item_counter += 1;
            }
        }

        let section = Section {
            id: section_id,
            name: section_name,
            summary: meta.summary.unwrap_or_default(),
            position,
            depth: 0,
            parent_id: None,
            items,
            subsections: Vec::new(), // no subsection support in this adapter
            is_visible: meta.is_visible.unwrap_or(true),
            available_from: meta.available_from.as_deref().and_then(parse_datetime),
            available_until: meta.available_until.as_deref().and_then(parse_datetime),
        };

        Ok((section, item_counter - item_start))
    }

    /// Resolve an item's text body from its backing file.
    ///
    /// Text-like files are read directly; anything else falls back to a
    /// same-stem `.txt` companion, then to an empty string.
    fn read_item_body(&self, file_path: &Path) -> Result<String> {
        if let Some(ext) = suffix(file_path)
            && TEXT_SUFFIXES.contains(&ext.as_str())
        {
            return Ok(fs::read_to_string(file_path)?);
        }

        let companion = file_path.with_extension("txt");
        if companion.exists() {
            return Ok(fs::read_to_string(&companion)?);
        }

        Ok(String::new())
    }
}

#[async_trait::async_trait]
impl CoursePort for FileAdapter {
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
        let file_path = self
            .item_registry
            .get(item_id)
            .ok_or_else(|| Error::item_not_found(item_id))?;
        self.read_item_body(file_path)
    }

    async fn search(&self, query: &str, course_id: &str) -> Result<Vec<SearchResult>> {
        let content = self
            .course_content_cache
            .get(course_id)
            .ok_or_else(|| Error::course_not_found(course_id))?;

        search_course(content, query, SectionWalk::TopLevel, |item| {
            match self.item_registry.get(&item.id) {
                Some(path) => self.read_item_body(path).map(Some),
                None => Ok(None),
            }
        })
    }
}

/// `_meta.yaml` shape; every field optional, defaults derive from the
/// directory name.
#[derive(Debug, Default, Deserialize)]
struct RawCourseMeta {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    instructor: Option<String>,
    #[serde(default)]
    semester: Option<String>,
}

/// `_section.yaml` shape.
#[derive(Debug, Default, Deserialize)]
struct RawSectionMeta {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    is_visible: Option<bool>,
    #[serde(default)]
    available_from: Option<String>,
    #[serde(default)]
    available_until: Option<String>,
}

/// Map a content file to an item, or `None` for unsupported extensions.
fn file_to_content_item(file_path: &Path, counter: usize) -> Option<ContentItem> {
    let (item_type, file_type) = match suffix(file_path)?.as_str() {
        "pdf" => (ItemType::File, Some("pdf")),
        "docx" => (ItemType::File, Some("docx")),
        "pptx" => (ItemType::File, Some("pptx")),
        "txt" | "md" | "html" => (ItemType::Page, None),
        _ => return None,
    };

    let stem = file_path.file_stem()?.to_str()?;
    let name = title_case(&stem.replace('_', " "));

    let mut item = ContentItem::new(format!("file_item_{counter}"), name, item_type);
    item.file_type = file_type.map(str::to_string);
    Some(item)
}

/// Directory entries in lexical order of file name.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();
    Ok(entries)
}

fn is_hidden(path: &Path) -> bool {
    file_name(path).starts_with('_')
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn suffix(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

/// Uppercase the first letter of each space-separated word.
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
