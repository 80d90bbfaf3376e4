use std::path::PathBuf;

/// Errors raised by the recommendation engine.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("no dataset found at {}", path.display())]
    DatasetNotFound { path: PathBuf },

    #[error("cached artifacts unusable: {0}")]
    ArtifactCorruption(String),

    #[error("Movie not found: {0}. Try an exact title or check spelling.")]
    MovieNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("encoding error: {0}")]
    Encode(#[from] bincode::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
