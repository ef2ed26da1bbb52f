use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Duplicate document '{0}' in metadata")]
    DuplicateKey(String),

    #[error("No documents left to partition after date validation")]
    EmptyCorpus,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Metadata decode failed: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
