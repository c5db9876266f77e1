use thiserror::Error;

/// Result type alias for lectern-core
pub type Result<T> = std::result::Result<T, Error>;

/// One error family shared by every adapter.
///
/// Lookup failures (`CourseNotFound`, `ItemNotFound`) are surfaced to callers
/// as recoverable domain errors. Load-time structural problems are logged and
/// skipped at the adapter level instead of raising, so the ambient variants
/// (`Io`, `Parse`, `Config`) only appear when a whole load cannot proceed.
#[derive(Debug, Error)]
pub enum Error {
    /// Course absent from the adapter's catalogue
    #[error("course not found: {course_id}")]
    CourseNotFound { course_id: String },

    /// Item absent from the content-item registry
    #[error("content item not found: {item_id}")]
    ItemNotFound { item_id: String },

    /// Permission failure (reserved for the real adapter)
    #[error("access denied to resource: {resource}")]
    AccessDenied { resource: String },

    /// Moodle API unreachable or not implemented
    #[error("Moodle API is currently unavailable: {0}")]
    MoodleUnavailable(String),

    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse/serialization errors
    #[error("parse error: {0}")]
    Parse(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a course-not-found error
    pub fn course_not_found(course_id: impl Into<String>) -> Self {
        Self::CourseNotFound { course_id: course_id.into() }
    }

    /// Create an item-not-found error
    pub fn item_not_found(item_id: impl Into<String>) -> Self {
        Self::ItemNotFound { item_id: item_id.into() }
    }

    /// Create an access-denied error
    pub fn access_denied(resource: impl Into<String>) -> Self {
        Self::AccessDenied { resource: resource.into() }
    }

    /// Create a Moodle-unavailable error
    pub fn moodle_unavailable(msg: impl Into<String>) -> Self {
        Self::MoodleUnavailable(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// True for the four domain errors callers are expected to handle,
    /// false for ambient failures (I/O, parse, config).
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            Error::CourseNotFound { .. }
                | Error::ItemNotFound { .. }
                | Error::AccessDenied { .. }
                | Error::MoodleUnavailable(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::course_not_found("COMP1001-2024");
        assert_eq!(err.to_string(), "course not found: COMP1001-2024");

        let err = Error::item_not_found("file_item_3");
        assert_eq!(err.to_string(), "content item not found: file_item_3");

        let err = Error::access_denied("gradebook");
        assert_eq!(err.to_string(), "access denied to resource: gradebook");

        let err = Error::moodle_unavailable("not yet implemented");
        assert_eq!(
            err.to_string(),
            "Moodle API is currently unavailable: not yet implemented"
        );

        let err = Error::parse("invalid JSON");
        assert_eq!(err.to_string(), "parse error: invalid JSON");

        let err = Error::Config("missing courses_path".to_string());
        assert_eq!(err.to_string(), "configuration error: missing courses_path");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert_eq!(err.to_string(), "I/O error: file not found");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_is_domain_error() {
        assert!(Error::course_not_found("c1").is_domain_error());
        assert!(Error::item_not_found("i1").is_domain_error());
        assert!(Error::access_denied("r1").is_domain_error());
        assert!(Error::moodle_unavailable("down").is_domain_error());

        assert!(!Error::parse("bad").is_domain_error());
        assert!(!Error::Config("bad".to_string()).is_domain_error());
        let io_err: Error = std::io::Error::other("boom").into();
        assert!(!io_err.is_domain_error());
    }

    #[test]
    fn test_result_type_alias() {
        let ok: Result<i32> = Ok(42);
        assert!(ok.is_ok());

        let err: Result<i32> = Err(Error::course_not_found("missing"));
        assert!(err.is_err());
    }
}
