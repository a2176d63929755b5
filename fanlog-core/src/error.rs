//! Error types for fanlog.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Result type for fanlog operations.
pub type Result<T> = std::result::Result<T, FanlogError>;

/// Errors surfaced to the caller. Sink write failures are not in here: they are
/// counted and reported by the [`Logger`](crate::Logger) instead of returned.
#[derive(Debug, Error)]
pub enum FanlogError {
    /// A log file could not be opened for appending.
    #[error("unable to open log file {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A level name that is not part of the level vocabulary.
    #[error("invalid level mask: {0:?}")]
    InvalidLevel(String),
    /// A default sink name other than `none` or `console`.
    #[error("invalid default sink: {0:?} (expected \"none\" or \"console\")")]
    InvalidDefaultSink(String),
    /// Another `log` backend is already installed.
    #[error("unable to install log bridge: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn open_file_error_names_the_path() {
        let err = FanlogError::OpenFile {
            path: PathBuf::from("/nope/app.log"),
            source: io::Error::new(ErrorKind::NotFound, "file not found"),
        };
        let text = err.to_string();
        assert!(text.contains("/nope/app.log"));
        assert!(text.contains("file not found"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn invalid_level_error() {
        let err = FanlogError::InvalidLevel("loud".to_owned());
        assert_eq!(err.to_string(), "invalid level mask: \"loud\"");
    }
}
