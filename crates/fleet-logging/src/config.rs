//! Configuration types for the logging system
//!
//! Activity entries forwarded by `fleet_activity::ActivitySink` arrive as
//! events under the [`ACTIVITY_TARGET`] target, with `sink`, `sequence`
//! and `entry_time` fields. [`LogConfig::activity_level`] filters them
//! separately from the rest of the process, and [`JsonlConfig`] decides how
//! much of the surrounding event metadata each JSONL line carries.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::LoggingError;

/// Target of the events emitted when activity entries are forwarded
pub const ACTIVITY_TARGET: &str = "fleet_activity::sink";

/// Main logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default log level (can be overridden by RUST_LOG)
    pub default_level: String,

    /// Level for forwarded activity entries, `None` to follow `default_level`
    ///
    /// Lets task activity stay visible while the rest of the process logs
    /// only warnings, or be silenced entirely with `"off"`.
    pub activity_level: Option<String>,

    /// Console output configuration
    pub console: ConsoleConfig,

    /// File output configuration
    pub file: Option<FileConfig>,

    /// JSONL output configuration
    pub jsonl: JsonlConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            activity_level: None,
            console: ConsoleConfig::default(),
            file: None,
            jsonl: JsonlConfig::default(),
        }
    }
}

impl LogConfig {
    /// Create a config for development (verbose console output)
    pub fn development() -> Self {
        Self {
            default_level: "debug".to_string(),
            console: ConsoleConfig {
                enabled: true,
                pretty: true,
                ansi: true,
                show_target: true,
            },
            ..Default::default()
        }
    }

    /// Create a config for production (JSONL file output only)
    ///
    /// The process logs warnings and above; task activity is kept at `info`.
    pub fn production(log_dir: PathBuf) -> Self {
        Self {
            default_level: "warn".to_string(),
            activity_level: Some("info".to_string()),
            console: ConsoleConfig {
                enabled: false,
                ..ConsoleConfig::default()
            },
            file: Some(FileConfig {
                directory: log_dir,
                prefix: "fleet".to_string(),
                rotation: RotationStrategy::Daily,
            }),
            jsonl: JsonlConfig {
                include_location: false,
                ..JsonlConfig::default()
            },
        }
    }

    /// Create a config for testing (minimal output)
    pub fn testing() -> Self {
        Self {
            default_level: "warn".to_string(),
            console: ConsoleConfig {
                show_target: false,
                ..ConsoleConfig::default()
            },
            ..Default::default()
        }
    }

    /// Filter directives for the level filter: the default level, then the
    /// activity override when one is set
    pub fn filter_directives(&self) -> String {
        match &self.activity_level {
            Some(level) => format!("{},{}={}", self.default_level, ACTIVITY_TARGET, level),
            None => self.default_level.clone(),
        }
    }

    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, LoggingError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoggingError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Console output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Enable console output
    pub enabled: bool,
    /// Use pretty (human-readable) format
    pub pretty: bool,
    /// Include ANSI colors
    pub ansi: bool,
    /// Print the event target, which tells forwarded activity apart from
    /// the process's own diagnostics
    pub show_target: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pretty: false, // JSONL by default
            ansi: false,
            show_target: true,
        }
    }
}

/// File output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// Directory for log files
    pub directory: PathBuf,
    /// File name prefix
    pub prefix: String,
    /// Rotation strategy
    pub rotation: RotationStrategy,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./logs"),
            prefix: "fleet".to_string(),
            rotation: RotationStrategy::Daily,
        }
    }
}

/// File rotation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RotationStrategy {
    /// Rotate daily
    #[default]
    Daily,
    /// Rotate hourly
    Hourly,
    /// Never rotate (single file, truncated on start)
    Never,
}

/// JSONL formatting configuration
///
/// With `flatten_events` the activity fields (`sink`, `sequence`,
/// `entry_time`) sit at the top level of each line next to `message`;
/// otherwise they are nested under `fields`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonlConfig {
    /// Flatten event fields to root level
    pub flatten_events: bool,
    /// Include the list of enclosing spans, e.g. the task span
    pub include_spans: bool,
    /// Include the innermost span under `span`
    pub include_current_span: bool,
    /// Include the event target
    pub include_target: bool,
    /// Include thread information
    pub include_thread_info: bool,
    /// Include file/line information; for forwarded activity this points at
    /// the sink, not at the code that wrote the entry
    pub include_location: bool,
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            flatten_events: true,
            include_spans: true,
            include_current_span: true,
            include_target: true,
            include_thread_info: false,
            include_location: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.default_level, "info");
        assert!(config.console.enabled);
        assert!(!config.console.pretty); // JSONL by default
        assert!(config.file.is_none());
    }

    #[test]
    fn test_development_config() {
        let config = LogConfig::development();
        assert_eq!(config.default_level, "debug");
        assert!(config.console.pretty);
        assert!(config.console.ansi);
    }

    #[test]
    fn test_production_config() {
        let config = LogConfig::production(PathBuf::from("/var/log/fleet"));
        assert!(!config.console.enabled);
        assert_eq!(config.default_level, "warn");
        assert_eq!(config.activity_level.as_deref(), Some("info"));
        assert!(!config.jsonl.include_location);
        let file = config.file.unwrap();
        assert_eq!(file.rotation, RotationStrategy::Daily);
        assert_eq!(file.prefix, "fleet");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = LogConfig::from_json(
            r#"{ "default_level": "trace", "file": { "directory": "/tmp/fleet", "prefix": "robot", "rotation": "never" } }"#,
        )
        .unwrap();

        assert_eq!(config.default_level, "trace");
        assert!(config.console.enabled);
        assert_eq!(config.file.unwrap().rotation, RotationStrategy::Never);
        assert!(config.jsonl.flatten_events);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            LogConfig::from_json("{ not json"),
            Err(LoggingError::Config(_))
        ));
    }

    #[test]
    fn test_filter_directives() {
        let mut config = LogConfig::default();
        assert_eq!(config.filter_directives(), "info");

        config.default_level = "warn".to_string();
        config.activity_level = Some("debug".to_string());
        assert_eq!(
            config.filter_directives(),
            "warn,fleet_activity::sink=debug"
        );
    }

    #[test]
    fn test_activity_level_from_json() {
        let config = LogConfig::from_json(
            r#"{ "activity_level": "off", "jsonl": { "include_target": false } }"#,
        )
        .unwrap();

        assert_eq!(config.activity_level.as_deref(), Some("off"));
        assert!(!config.jsonl.include_target);
        // Unset JSONL fields keep their defaults
        assert!(config.jsonl.flatten_events);
    }
}
