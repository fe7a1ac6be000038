use std::path::PathBuf;

use storage::error::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeedError>;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Classification is for {found_season} round {found_round}, expected {season} round {round}")]
    EventMismatch {
        season: i32,
        round: i32,
        found_season: i32,
        found_round: i32,
    },

    #[error("Schedule is for season {found}, expected {season}")]
    SeasonMismatch { season: i32, found: i32 },

    #[error("Data transformation error: {0}")]
    TransformationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<FeedError> for StorageError {
    fn from(err: FeedError) -> Self {
        StorageError::Source(Box::new(err))
    }
}
