//! Process-wide `tracing` setup for plugins loaded into a host engine.
//!
//! The host owns stdout/stderr and rarely shows them, so the subscriber can
//! be pointed at a file through the environment.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

/// Filter directive, e.g. `debug` or `gpu_interop=trace`.
pub const LOG_FILTER_ENV: &str = "UNITY_GRAPHICS_HELPER_LOG";
/// Optional log file path. Lines are appended.
pub const LOG_FILE_ENV: &str = "UNITY_GRAPHICS_HELPER_LOG_FILE";

const DEFAULT_FILTER: &str = "warn";

static INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub filter: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_owned(),
            file: None,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value: &String| !value.trim().is_empty());
        Self {
            filter: non_empty(LOG_FILTER_ENV).unwrap_or_else(|| DEFAULT_FILTER.to_owned()),
            file: non_empty(LOG_FILE_ENV).map(PathBuf::from),
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Only the first call has any effect.
pub fn init_logging(config: &LogConfig) {
    INIT.get_or_init(|| {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(config.env_filter())
            .with_ansi(false)
            .with_target(true);

        // A host may already have installed a subscriber; keep theirs.
        let installed = match config.file.as_deref().map(open_log_file) {
            Some(Ok(file)) => builder.with_writer(Mutex::new(file)).try_init().is_ok(),
            Some(Err(err)) => {
                let installed = builder.with_writer(std::io::stderr).try_init().is_ok();
                tracing::warn!("logging to stderr instead: {err:#}");
                installed
            }
            None => builder.with_writer(std::io::stderr).try_init().is_ok(),
        };

        if installed {
            tracing::debug!(filter = %config.filter, file = ?config.file, "logging initialized");
        }
    });
}

fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = LogConfig::from_lookup(|_| None);
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.filter, "warn");
        assert!(config.file.is_none());
    }

    #[test]
    fn reads_filter_and_file() {
        let config = LogConfig::from_lookup(|key| match key {
            LOG_FILTER_ENV => Some("gpu_interop=trace".into()),
            LOG_FILE_ENV => Some("C:/logs/helper.log".into()),
            _ => None,
        });
        assert_eq!(config.filter, "gpu_interop=trace");
        assert_eq!(config.file, Some(PathBuf::from("C:/logs/helper.log")));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = LogConfig::from_lookup(|_| Some("  ".into()));
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn init_is_idempotent() {
        let config = LogConfig::default();
        init_logging(&config);
        init_logging(&config);
        assert!(INIT.get().is_some());
    }
}
