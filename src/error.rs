use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for corpus counting and pair scoring.
#[derive(Debug, Error)]
pub enum PmiError {
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("format error in {} line {line}: {message}", path.display())]
    Format {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl PmiError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PmiError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, PmiError>;
