use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// Which data source backs the course port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterMode {
    /// JSON fixtures from a named scenario (default)
    #[default]
    Stub,
    /// Local filesystem mirror of course materials
    File,
    /// Live Moodle Web Services API (placeholder)
    Real,
}

impl AdapterMode {
    pub const VALUES: &[AdapterMode] = &[AdapterMode::Stub, AdapterMode::File, AdapterMode::Real];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterMode::Stub => "stub",
            AdapterMode::File => "file",
            AdapterMode::Real => "real",
        }
    }
}

impl std::fmt::Display for AdapterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AdapterMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stub" => Ok(AdapterMode::Stub),
            "file" => Ok(AdapterMode::File),
            "real" => Ok(AdapterMode::Real),
            _ => Err(crate::Error::Config(
                ConfigError::InvalidAdapterMode(s.to_string()).to_string(),
            )),
        }
    }
}

/// Settings for the fixture-backed stub adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StubSettings {
    /// Scenario folder name under `stubs_root`
    pub scenario: String,
    /// Directory holding the stub scenarios
    pub stubs_root: PathBuf,
}

impl Default for StubSettings {
    fn default() -> Self {
        Self { scenario: "demo_course".to_string(), stubs_root: PathBuf::from("data/stubs") }
    }
}

/// Settings for the filesystem adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    /// Root directory of course folders
    pub courses_path: PathBuf,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self { courses_path: PathBuf::from("data/courses") }
    }
}

/// Settings for the real Moodle adapter.
///
/// `timeout_secs` and `cache_ttl_secs` are accepted but unused until the
/// real adapter is implemented.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RealSettings {
    /// Base URL for the Moodle Web Services API
    pub api_base_url: String,
    /// Web Services API token
    pub api_token: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Cache TTL in seconds (0 = no cache)
    pub cache_ttl_secs: u64,
}

impl Default for RealSettings {
    fn default() -> Self {
        Self { api_base_url: String::new(), api_token: String::new(), timeout_secs: 30, cache_ttl_secs: 3600 }
    }
}

/// Adapter selection plus per-mode settings.
///
/// All three mode sections are always present so switching `mode` (or
/// forcing one on the command line) never requires a different file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterSettings {
    pub mode: AdapterMode,
    pub stub: StubSettings,
    pub file: FileSettings,
    pub real: RealSettings,
}

/// Logging settings, `[logging]` in lectern.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default log level for stderr output
    pub level: String,
    /// Output format: "pretty", "json", or "compact"
    pub format: String,
    pub file: FileLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: "pretty".to_string(), file: FileLoggingConfig::default() }
    }
}

/// File logging settings, `[logging.file]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileLoggingConfig {
    pub enabled: bool,
    pub level: String,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self { enabled: false, level: "debug".to_string() }
    }
}

/// Root configuration structure for lectern.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub adapter: AdapterSettings,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(toml_str).map_err(|e| crate::Error::Config(format!("TOML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        use crate::Error;

        if self.adapter.stub.scenario.is_empty() {
            return Err(Error::Config(
                ConfigError::MissingValue("adapter.stub.scenario".to_string()).to_string(),
            ));
        }
        if self.adapter.stub.stubs_root.as_os_str().is_empty() {
            return Err(Error::Config(
                ConfigError::MissingValue("adapter.stub.stubs_root".to_string()).to_string(),
            ));
        }
        if self.adapter.file.courses_path.as_os_str().is_empty() {
            return Err(Error::Config(
                ConfigError::MissingValue("adapter.file.courses_path".to_string()).to_string(),
            ));
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# Lectern Configuration Example
# Copy this file to lectern.toml and customize as needed

[adapter]
# Adapter mode: "stub", "file", or "real"
mode = "stub"

[adapter.stub]
# Fixture scenario folder under stubs_root
scenario = "demo_course"
stubs_root = "data/stubs"

[adapter.file]
# Root directory of course folders (one subdirectory per course)
courses_path = "data/courses"

[adapter.real]
# Moodle Web Services API (placeholder - the real adapter is not implemented)
api_base_url = ""
api_token = ""
timeout_secs = 30
cache_ttl_secs = 3600

[logging]
level = "warn"
format = "pretty"

[logging.file]
enabled = false
level = "debug"
"#
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid adapter mode
    #[error("invalid adapter mode: {0} (valid options: stub, file, real)")]
    InvalidAdapterMode(String),

    /// Required value missing or empty
    #[error("missing required value: {0}")]
    MissingValue(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}
