// Copyright (c) 2026 rezky_nightky

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalaxyError {
    #[error("failed to apply {name} {value} ({reason})")]
    InvalidArgument {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid effect: {0} (see --list-effects)")]
    UnknownEffect(String),

    #[error("invalid color: {0} (see --list-colors)")]
    UnknownColor(String),

    #[error("unsupported charset: {0} (see --list-charsets)")]
    UnknownCharset(String),

    #[error("failed to open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl GalaxyError {
    pub fn invalid(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GalaxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_message_names_flag_and_limits() {
        let e = GalaxyError::invalid("--fps", 500, "min 1 max 240");
        assert_eq!(e.to_string(), "failed to apply --fps 500 (min 1 max 240)");
    }
}
