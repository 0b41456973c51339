use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Missing required field: {0}")]
    Validation(&'static str),

    #[error("Assignment not found: {0}")]
    NotFound(u64),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded with {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
