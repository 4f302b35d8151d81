//! Errors that can happen while editing or syncing the tracker

use thiserror::Error;

use crate::item::RecordId;

/// Everything that can go wrong in this crate
#[derive(Debug, Error)]
pub enum TrackerError {
    /// There is no record with this ID in the table.
    /// In a correctly driven UI this should never happen
    #[error("no record with ID {0}")]
    NotFound(RecordId),

    /// The document is not shaped like the expected workbook
    #[error("invalid document: {0}")]
    Schema(String),

    /// The remote file store could not be read or written (for any other reason than a missing file)
    #[error("remote store error: {0}")]
    Transport(String),

    /// The requested week is too far from the current one
    #[error("week offset {0} is out of range")]
    InvalidWeek(i64),

    /// The configuration is incomplete or invalid
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for TrackerError {
    fn from(err: reqwest::Error) -> Self {
        TrackerError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Schema(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
