//! Subscriber setup for the crate's `tracing` events.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable that turns on development logging.
pub const DEV_ENV: &str = "SHORTHAND_DEV";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// Debug output from this crate; `RUST_LOG` overrides the filter.
    Development,
    /// Errors only.
    Quiet,
}

impl LogMode {
    /// Development when `dev` is set or the environment asks for it.
    pub fn select(dev: bool) -> Self {
        let env_dev = std::env::var(DEV_ENV).is_ok_and(|v| is_truthy(&v));
        if dev || env_dev {
            Self::Development
        } else {
            Self::Quiet
        }
    }

    fn filter(self) -> EnvFilter {
        match self {
            Self::Development => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shorthand=debug")),
            Self::Quiet => EnvFilter::new("error"),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes" | "on")
}

/// Log file used in development when none is given, so output does not
/// land on the editor's screen.
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("shorthand.log")
}

/// Install the global subscriber. Events go to `log_path` if given, else
/// to stderr.
///
/// # Errors
/// Returns an error if the log file cannot be created or a subscriber is
/// already installed.
pub fn init(mode: LogMode, log_path: Option<&Path>) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(mode.filter());
    let installed = if let Some(path) = log_path {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    } else {
        builder.with_writer(std::io::stderr).try_init()
    };
    installed.map_err(|err| anyhow::anyhow!(err).context("Failed to install logger"))
}
