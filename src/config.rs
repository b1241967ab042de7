use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub(crate) const DATA_DIR_VAR: &str = "DOMPET_DATA_DIR";
pub(crate) const LOG_VAR: &str = "DOMPET_LOG";
pub(crate) const DEFAULT_LOG_FILTER: &str = "dompet=info";

const LOG_FILE: &str = "dompet.log";

/// Runtime settings, resolved once at startup from the environment and the
/// platform data directory.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    /// `None` when neither the override nor a platform directory is available.
    pub(crate) data_dir: Option<PathBuf>,
    pub(crate) log_filter: String,
    /// Where reports go when no path is given.
    pub(crate) export_dir: PathBuf,
}

impl Config {
    pub(crate) fn from_env() -> Self {
        Self::resolve(|key| std::env::var(key).ok())
    }

    pub(crate) fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = match non_empty(lookup(DATA_DIR_VAR)) {
            Some(dir) => Some(PathBuf::from(dir)),
            None => directories::ProjectDirs::from("com", "dompet", "Dompet")
                .map(|dirs| dirs.data_dir().to_path_buf()),
        };
        let log_filter =
            non_empty(lookup(LOG_VAR)).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let export_dir = non_empty(lookup("HOME"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            data_dir,
            log_filter,
            export_dir,
        }
    }

    /// Creates the data directory and returns it.
    pub(crate) fn ensure_data_dir(&self) -> Result<&Path> {
        let dir = self
            .data_dir
            .as_deref()
            .context("Could not determine data directory")?;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        Ok(dir)
    }

    pub(crate) fn log_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(LOG_FILE))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
