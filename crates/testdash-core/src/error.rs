use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashError {
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("invalid test file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("path is outside the configured project roots: {0}")]
    PathOutsideRoots(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DashError>;
