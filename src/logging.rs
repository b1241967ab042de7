use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, DEFAULT_LOG_FILTER};

/// Installs the global subscriber. Output goes to the log file in the data
/// directory so it never draws over the terminal UI; stderr is the fallback.
pub(crate) fn init(config: &Config) {
    let filter = match EnvFilter::try_new(&config.log_filter) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Ignoring invalid log filter '{}': {e}", config.log_filter);
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }
    };

    let opened = config.log_path().map(|path| {
        let file = OpenOptions::new().create(true).append(true).open(&path);
        (path, file)
    });
    match opened {
        Some((path, Ok(file))) => {
            let installed = fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
            if installed.is_ok() {
                tracing::debug!(path = %path.display(), "logging to file");
            }
        }
        Some((path, Err(e))) => {
            if init_stderr(filter) {
                tracing::warn!(path = %path.display(), error = %e, "log file unavailable, logging to stderr");
            }
        }
        None => {
            init_stderr(filter);
        }
    }
}

fn init_stderr(filter: EnvFilter) -> bool {
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
