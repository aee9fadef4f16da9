use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AnalyzeError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The Java grammar could not be loaded into the parser.
    #[error("parser setup failed: {0}")]
    Setup(String),

    #[error("input root {} is missing or unreadable", path.display())]
    InputRoot { path: PathBuf },

    #[error("parse failed for {}", path.display())]
    Parse { path: PathBuf },

    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyzeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalyzeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Fatal errors abort the run before any file is analyzed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AnalyzeError::Setup(_) | AnalyzeError::InputRoot { .. })
    }
}
