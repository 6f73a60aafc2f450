//! Error types for DueNote.

use chrono::{DateTime, Local};
use thiserror::Error;

/// Infrastructure errors raised while bringing the service up.
#[derive(Debug, Error)]
pub enum DueNoteError {
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DueNoteError>;

/// Outcome of a failed note operation.
///
/// Every variant is terminal for the request that produced it. The gateway
/// decides which HTTP status each one maps to.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NoteError {
    #[error("empty payload")]
    EmptyPayload,

    #[error("payload too large: {len} characters (max {max})")]
    TooLarge { len: usize, max: usize },

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("invalid time: {0}")]
    InvalidTime(String),

    #[error("note with id {0} already exists")]
    DuplicateId(i64),

    #[error("a note is already due at {}", .0.format("%Y-%m-%d %H:%M:%S"))]
    DuplicateDeadline(DateTime<Local>),

    #[error("note with id {0} not found")]
    NotFound(i64),

    #[error("invalid note id: {0}")]
    InvalidId(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl NoteError {
    /// Whether the failure was caused by the client's request rather than
    /// by the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, NoteError::Unexpected(_))
    }
}
