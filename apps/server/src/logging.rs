use anyhow::{Context, Result};
use std::str::FromStr;
use waitlist::domain::config::LoggingConfig;
use waitlist_logger::{FileSink, LevelFilter, Logger};

/// Installs the global subscriber described by the `[logging]` section.
///
/// # Errors
/// Fails on an unknown level, a malformed filter, an unusable log directory,
/// or when a subscriber is already installed.
pub fn init_logger(name: &str, cfg: &LoggingConfig) -> Result<Logger> {
    let level = LevelFilter::from_str(&cfg.level)
        .with_context(|| format!("Unknown log level '{}'", cfg.level))?;

    let mut builder = Logger::builder().name(name).level(level).console(cfg.console);
    if let Some(filter) = &cfg.filter {
        builder = builder.env_filter(filter);
    }
    if let Some(file) = &cfg.file {
        builder = builder.file(FileSink::new(&file.dir).json(file.json).max_files(file.max_files));
    }

    Ok(builder.init()?)
}
