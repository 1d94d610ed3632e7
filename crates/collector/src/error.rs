use thiserror::Error;

pub type Result<T> = std::result::Result<T, CollectorError>;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid race id range: {start} to {end}")]
    InvalidRange { start: i64, end: i64 },
}

impl CollectorError {
    /// Failures talking to the race source. These never abort a run.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CollectorError::Request(_) | CollectorError::Parse(_) | CollectorError::Graphql(_)
        )
    }
}
