//! The port interface every adapter must satisfy.

use lectern_core::Result;
use lectern_core::types::{CourseContent, CourseInfo, SearchResult};

/// Abstract interface for course content access.
///
/// This defines OUR requirements, not Moodle's capabilities; adapters
/// translate their data source into this contract. `course_id` is always
/// required - search is scoped to one pre-selected course, never global.
#[async_trait::async_trait]
pub trait CoursePort: Send + Sync {
    /// Get course metadata.
    ///
    /// Fails with [`lectern_core::Error::CourseNotFound`] if the course is
    /// absent from the adapter's catalogue.
    async fn get_course_info(&self, course_id: &str) -> Result<CourseInfo>;

    /// Get the full structured content of a course.
    ///
    /// Returns all sections (with subsections nested) and their items.
    /// Extracted text bodies are NOT included - use [`Self::get_item_content`].
    async fn get_course_content(&self, course_id: &str) -> Result<CourseContent>;

    /// Get the extracted text content of a content item.
    ///
    /// Returns an empty string (not an error) when a known item has no
    /// extractable body. Fails with [`lectern_core::Error::ItemNotFound`]
    /// if the item is unknown.
    async fn get_item_content(&self, item_id: &str) -> Result<String>;

    /// Search within a specific course's materials.
    ///
    /// Results are stable-sorted descending by relevance score. Fails with
    /// [`lectern_core::Error::CourseNotFound`] if the course is unknown.
    async fn search(&self, query: &str, course_id: &str) -> Result<Vec<SearchResult>>;
}

/// Outcome of driving all four port operations through the vtable.
///
/// An operation "responds" when it completes with `Ok` or a typed domain
/// error; an ambient failure (I/O, parse, config) marks it unresponsive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortProbe {
    pub course_info: bool,
    pub course_content: bool,
    pub item_content: bool,
    pub search: bool,
}

impl PortProbe {
    /// True when every operation responded.
    pub fn is_conformant(&self) -> bool {
        self.course_info && self.course_content && self.item_content && self.search
    }
}

/// Probe a dynamically selected adapter for port conformance.
///
/// The compile-time trait bound already guarantees the four operations
/// exist; this helper additionally confirms each responds with `Ok` or a
/// typed domain error when driven with probe identifiers. Useful for
/// status commands and tests over `dyn CoursePort`.
pub async fn verify_port(port: &dyn CoursePort) -> PortProbe {
    const PROBE_COURSE: &str = "__port_probe_course__";
    const PROBE_ITEM: &str = "__port_probe_item__";

    fn responds<T>(result: &Result<T>) -> bool {
        match result {
            Ok(_) => true,
            Err(e) => e.is_domain_error(),
        }
    }

    PortProbe {
        course_info: responds(&port.get_course_info(PROBE_COURSE).await),
        course_content: responds(&port.get_course_content(PROBE_COURSE).await),
        item_content: responds(&port.get_item_content(PROBE_ITEM).await),
        search: responds(&port.search("probe", PROBE_COURSE).await),
    }
}
