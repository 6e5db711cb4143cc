// Copyright (c) 2026 rezky_nightky

use std::env;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{GalaxyError, Result};

pub const LOG_ENV: &str = "GALAXY_LOG";
const DEFAULT_FILTER: &str = "info";

fn filter_from(spec: Option<String>) -> EnvFilter {
    let spec = spec.unwrap_or_else(|| DEFAULT_FILTER.to_string());
    EnvFilter::try_new(spec).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber, appending to `path`. The terminal is
/// busy with the animation, so without a path nothing is installed and
/// events are dropped. Returns whether a subscriber is now logging.
pub fn init(path: Option<&Path>) -> Result<bool> {
    let Some(path) = path else {
        return Ok(false);
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| GalaxyError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);
    let registry = tracing_subscriber::registry()
        .with(filter_from(env::var(LOG_ENV).ok()))
        .with(fmt_layer);
    Ok(registry.try_init().is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_path_installs_nothing() {
        assert!(!init(None).unwrap());
    }

    #[test]
    fn unopenable_path_is_a_log_file_error() {
        let path = env::temp_dir()
            .join("galaxy-missing-dir-for-tests")
            .join("nested")
            .join("galaxy.log");
        let err = init(Some(&path)).unwrap_err();
        assert!(matches!(err, GalaxyError::LogFile { .. }));
        assert!(err.to_string().contains("galaxy.log"));
    }
}
