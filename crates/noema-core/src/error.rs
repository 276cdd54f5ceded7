use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid node: {node}. Valid: {valid}")]
    InvalidState { node: String, valid: String },

    #[error("Unsupported memory tier: {0}")]
    UnsupportedTier(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Incomplete episode: {0}")]
    IncompleteEpisode(String),

    #[error("Malformed record {path}: {reason}")]
    MalformedRecord { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
