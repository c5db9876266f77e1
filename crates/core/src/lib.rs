pub mod config;
pub mod error;
pub mod logging;
pub mod search;
pub mod types;

pub use config::{AdapterMode, AdapterSettings, Config, FileSettings, LoggingConfig, RealSettings, StubSettings};
pub use error::{Error, Result};
pub use logging::{LogFormat, init_logging};
pub use search::{
    CONTENT_MATCH_SCORE, NAME_MATCH_SCORE, SNIPPET_CONTEXT_CHARS, SectionWalk, make_snippet, search_course,
};
pub use types::{
    ContentItem, CourseContent, CourseInfo, ItemType, SearchResult, Section, parse_datetime,
};
