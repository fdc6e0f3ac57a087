//! # Logger
//!
//! Installs the process-wide `tracing` subscriber for the waitlist binaries.
//!
//! * Console output uses the compact formatter with ANSI colours.
//! * An optional [`FileSink`] adds a rolling, non-blocking file writer
//!   (plain text or JSON lines).
//! * Filtering starts from [`LoggerBuilder::level`] and honours `RUST_LOG`,
//!   or an explicit [`LoggerBuilder::env_filter`] directive string.
//!
//! ## Example
//!
//! ```rust
//! use waitlist_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("waitlist-server")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// Rolling file output settings.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl FileSink {
    /// Writes log files into `dir`, rotating daily and keeping ten files.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), rotation: Rotation::DAILY, max_files: DEFAULT_MAX_FILES, json: false }
    }

    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// Emits one JSON object per line instead of the text format.
    #[must_use]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[derive(Debug)]
pub struct Unnamed;
#[derive(Debug)]
pub struct Named(String);

mod private {
    pub trait Sealed {}
}
impl Sealed for Unnamed {}
impl Sealed for Named {}

/// Configures the global subscriber. A name is required before [`LoggerBuilder::init`]
/// becomes available; it prefixes rolling log files.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = Unnamed> {
    name: N,
    console: bool,
    level: LevelFilter,
    env_filter: Option<String>,
    file: Option<FileSink>,
}

impl LoggerBuilder<Unnamed> {
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named> {
        LoggerBuilder {
            name: Named(name.into()),
            console: self.console,
            level: self.level,
            env_filter: self.env_filter,
            file: self.file,
        }
    }
}

impl<N: Sealed> LoggerBuilder<N> {
    /// Minimum level emitted when neither `RUST_LOG` nor an explicit filter says otherwise.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Explicit filter directives (e.g. `waitlist=debug,surrealdb=warn`).
    ///
    /// Invalid directives make [`LoggerBuilder::init`] fail.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn file(mut self, sink: FileSink) -> Self {
        self.file = Some(sink);
        self
    }
}

impl LoggerBuilder<Named> {
    /// Installs the subscriber.
    ///
    /// Keep the returned [`Logger`] alive for the whole program: dropping it stops
    /// the background file writer.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, `max_files == 0`,
    ///   a malformed filter, or when every output is disabled.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] when the log directory is unusable.
    /// * [`LoggerError::Subscriber`] when a global subscriber already exists.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0;
        if name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
                context: None,
            });
        }

        let env_filter = build_env_filter(self.level, self.env_filter.as_deref())?;
        let mut layers = Vec::new();

        if self.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = match self.file {
            Some(sink) => {
                if sink.max_files == 0 {
                    return Err(LoggerError::InvalidConfiguration {
                        message: "max_files must be greater than zero".into(),
                        context: None,
                    });
                }

                fs::create_dir_all(&sink.dir)
                    .context(format!("Failed to create {}", sink.dir.display()))?;

                let appender = RollingFileAppender::builder()
                    .rotation(sink.rotation)
                    .filename_prefix(&name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(sink.max_files)
                    .build(&sink.dir)?;
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let file_layer = layer().with_writer(writer).with_ansi(false);
                layers.push(if sink.json { file_layer.json().boxed() } else { file_layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No output enabled; turn on the console or add a file sink".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;
        tracing::debug!(logger = %name, "Logging initialized");

        Ok(Logger { guard })
    }
}

/// Handle to the installed subscriber; owns the file writer guard.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn builder() -> LoggerBuilder {
        LoggerBuilder {
            name: Unnamed,
            console: true,
            level: LevelFilter::INFO,
            env_filter: None,
            file: None,
        }
    }

    /// The file writer guard, present when a [`FileSink`] was configured.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

fn build_env_filter(level: LevelFilter, directives: Option<&str>) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(level.into());
    match directives {
        None => Ok(builder.from_env_lossy()),
        Some(filter) => builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("Invalid env filter '{filter}': {e}").into(),
            context: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn builder_defaults() {
        let builder = Logger::builder().name("waitlist-test");
        assert!(builder.console);
        assert_eq!(builder.level, LevelFilter::INFO);
        assert!(builder.env_filter.is_none());
        assert!(builder.file.is_none());
    }

    #[test]
    #[serial]
    fn builder_collects_file_sink() {
        let builder = Logger::builder()
            .name("waitlist-test")
            .console(false)
            .env_filter("waitlist=debug")
            .file(FileSink::new("logs").max_files(3).json(true))
            .level(LevelFilter::DEBUG);

        assert!(!builder.console);
        assert_eq!(builder.level, LevelFilter::DEBUG);
        assert_eq!(builder.env_filter.as_deref(), Some("waitlist=debug"));
        let sink = builder.file.expect("file sink");
        assert_eq!(sink.dir(), Path::new("logs"));
        assert_eq!(sink.max_files, 3);
        assert!(sink.json);
    }

    #[test]
    #[serial]
    fn rejects_invalid_settings_before_installing() {
        let empty_name = Logger::builder().name("  ").init();
        assert!(matches!(empty_name, Err(LoggerError::InvalidConfiguration { .. })));

        let bad_filter = Logger::builder().name("waitlist-test").env_filter("=[").init();
        assert!(matches!(bad_filter, Err(LoggerError::InvalidConfiguration { .. })));

        let no_output = Logger::builder().name("waitlist-test").console(false).init();
        assert!(matches!(no_output, Err(LoggerError::InvalidConfiguration { .. })));

        let zero_files = Logger::builder()
            .name("waitlist-test")
            .file(FileSink::new(std::env::temp_dir()).max_files(0))
            .init();
        assert!(matches!(zero_files, Err(LoggerError::InvalidConfiguration { .. })));
    }
}
