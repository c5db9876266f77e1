//! Placeholder for the live Moodle Web Services adapter.
//!
//! Keeps the factory wiring and configuration surface in place so that
//! switching to the real API later is a drop-in change. Every operation
//! currently fails with [`Error::MoodleUnavailable`].

use tracing::warn;

use crate::port::CoursePort;
use lectern_core::config::RealSettings;
use lectern_core::types::{CourseContent, CourseInfo, SearchResult};
use lectern_core::{Error, Result};

/// Not-yet-implemented adapter for the institutional Moodle instance.
pub struct RemoteAdapter {
    settings: RealSettings,
}

impl RemoteAdapter {
    pub fn new(settings: RealSettings) -> Self {
        if settings.api_base_url.is_empty() || settings.api_token.is_empty() {
            warn!("remote adapter configured without api_base_url/api_token");
        }
        Self { settings }
    }

    pub fn api_base_url(&self) -> &str {
        &self.settings.api_base_url
    }

    fn unavailable() -> Error {
        Error::moodle_unavailable(
            "the remote Moodle adapter is not implemented yet; use adapter mode \"stub\" or \"file\"",
        )
    }
}

#[async_trait::async_trait]
impl CoursePort for RemoteAdapter {
    async fn get_course_info(&self, _course_id: &str) -> Result<CourseInfo> {
        Err(Self::unavailable())
    }

    async fn get_course_content(&self, _course_id: &str) -> Result<CourseContent> {
        Err(Self::unavailable())
    }

    async fn get_item_content(&self, _item_id: &str) -> Result<String> {
        Err(Self::unavailable())
    }

    async fn search(&self, _query: &str, _course_id: &str) -> Result<Vec<SearchResult>> {
        Err(Self::unavailable())
    }
}
