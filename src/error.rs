// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("rule not found: {0}")]
    RuleNotFound(String),

    #[error("corpus root does not exist: {0}")]
    CorpusRootMissing(PathBuf),

    #[error("malformed target descriptor {path}: {reason}")]
    MalformedTarget { path: PathBuf, reason: String },

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
}

impl HarnessError {
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        HarnessError::Io {
            source,
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
