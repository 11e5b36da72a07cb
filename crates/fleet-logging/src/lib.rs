//! Structured logging setup for fleet task services
//!
//! This crate wires the process-wide `tracing` pipeline: console output
//! (human-readable or JSONL), rolling JSONL file output, and task context
//! attached to spans.
//!
//! # Quick Start
//!
//! ```ignore
//! use fleet_logging::{FleetSubscriberBuilder, LogConfig};
//!
//! // JSONL to console
//! FleetSubscriberBuilder::new().init();
//!
//! // Development mode with human-readable output
//! FleetSubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init();
//! ```
//!
//! # Task Context
//!
//! Use [`TaskContextGuard`] to tag every span opened while a task runs:
//!
//! ```ignore
//! use fleet_logging::TaskContextGuard;
//!
//! let _guard = TaskContextGuard::new(&booking);
//! let _span = tracing::info_span!("phase", name = "Go to pick up").entered();
//! ```

pub mod config;
pub mod context;
pub mod layers;

pub use config::{ACTIVITY_TARGET, ConsoleConfig, FileConfig, JsonlConfig, LogConfig, RotationStrategy};
pub use context::{TaskContextData, TaskContextGuard};
pub use layers::{TaskContextExtension, TaskContextLayer, jsonl_layer};

use std::fs::{self, File};

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    filter::ParseError,
    layer::{Layered, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

/// Errors raised while setting up logging
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Log file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid logging config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid level filter: {0}")]
    Filter(#[from] ParseError),

    #[error("Failed to create rolling log file: {0}")]
    Appender(#[from] InitError),

    #[error("Global subscriber already set: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Registry plus level filter, the base every output layer sits on
pub type BaseSubscriber = Layered<EnvFilter, Registry>;

/// A type-erased output layer
pub type BoxedLayer = Box<dyn Layer<BaseSubscriber> + Send + Sync>;

/// The fully assembled subscriber
pub type FleetSubscriber = Layered<Vec<BoxedLayer>, BaseSubscriber>;

/// Builder for configuring and initializing the logging subscriber
///
/// By default, console output uses JSONL format. Use
/// [`LogConfig::development()`] for human-readable output.
pub struct FleetSubscriberBuilder {
    config: LogConfig,
}

impl FleetSubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Set the level for forwarded activity entries
    pub fn with_activity_level(mut self, level: impl Into<String>) -> Self {
        self.config.activity_level = Some(level.into());
        self
    }

    /// Assemble the subscriber without installing it
    ///
    /// Configured levels are always validated, but `RUST_LOG` takes
    /// precedence over them when set. The returned guard (present when file
    /// output is configured) must be kept alive for buffered file writes to
    /// be flushed.
    pub fn build(self) -> Result<(FleetSubscriber, Option<WorkerGuard>), LoggingError> {
        let configured = EnvFilter::try_new(self.config.filter_directives())?;
        let env_filter = EnvFilter::try_from_default_env().unwrap_or(configured);

        let mut layers: Vec<BoxedLayer> = vec![TaskContextLayer::new().boxed()];

        if self.config.console.enabled {
            if self.config.console.pretty {
                layers.push(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(self.config.console.ansi)
                        .with_target(self.config.console.show_target)
                        .boxed(),
                );
            } else {
                layers.push(jsonl_layer(std::io::stdout, &self.config.jsonl).boxed());
            }
        }

        let mut guard = None;
        if let Some(file_config) = &self.config.file {
            let (writer, file_guard) = file_writer(file_config)?;
            layers.push(jsonl_layer(writer, &self.config.jsonl).boxed());
            guard = Some(file_guard);
        }

        let subscriber = Registry::default().with(env_filter).with(layers);
        Ok((subscriber, guard))
    }

    /// Install the subscriber globally
    ///
    /// Returns an error if a global subscriber has already been set.
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let (subscriber, guard) = self.build()?;
        subscriber.try_init()?;
        Ok(guard)
    }

    /// Install the subscriber globally, reporting failures on stderr
    ///
    /// Keep the returned guard alive for the duration of the program when
    /// file output is enabled.
    pub fn init(self) -> Option<WorkerGuard> {
        match self.try_init() {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Warning: Failed to initialize logging: {}", e);
                None
            }
        }
    }
}

impl Default for FleetSubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the file writer; `Never` truncates a single file, the others roll
fn file_writer(file_config: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    let rotation = match file_config.rotation {
        RotationStrategy::Never => {
            fs::create_dir_all(&file_config.directory)?;
            let file_path = file_config
                .directory
                .join(format!("{}.log", file_config.prefix));
            let file = File::create(&file_path)?;
            return Ok(tracing_appender::non_blocking(file));
        }
        RotationStrategy::Daily => Rotation::DAILY,
        RotationStrategy::Hourly => Rotation::HOURLY,
    };

    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(&file_config.prefix)
        .build(&file_config.directory)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Initialize logging with default settings (JSONL to console)
pub fn init_default() {
    FleetSubscriberBuilder::new().init();
}

/// Initialize logging for development (verbose, pretty console output)
pub fn init_development() {
    FleetSubscriberBuilder::new()
        .with_config(LogConfig::development())
        .init();
}

/// Initialize logging for testing (minimal output)
pub fn init_testing() {
    let _ = FleetSubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .try_init();
}
