use std::io;
use std::path::Path;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WtfError>;

#[derive(Debug, Error)]
pub enum WtfError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("can't make backup of {path}: {backup} already exists")]
    BackupExists { path: String, backup: String },

    #[error("invalid config {path}: {message}")]
    Config { path: String, message: String },

    #[error("{0}")]
    Usage(String),
}

/// Attach `path` to an I/O error.
pub fn io_at(path: &Path) -> impl FnOnce(io::Error) -> WtfError + '_ {
    move |source| WtfError::Io {
        path: path.to_string_lossy().to_string(),
        source,
    }
}
