//! Error types produced by review stores and the collector.
//!
//! | Error | Raised when |
//! |-------|-------------|
//! | [`Scan`](SourceError::Scan) | The store rejected or failed a page request |
//! | [`InvalidToken`](SourceError::InvalidToken) | A continuation token was not issued by this store |
//! | [`Io`](SourceError::Io) | A file-backed store could not be read or written |
//! | [`Decode`](SourceError::Decode) | A file-backed store holds something other than an array of objects |
//! | [`MissingItem`](SourceError::MissingItem) | A write-back targeted a key the store does not hold |
//! | [`Backend`](SourceError::Backend) | Internal store failure (poisoned lock and the like) |
//!
//! None of these are retried. The collector surfaces the first one it sees
//! and discards whatever pages it had already read.
use thiserror::Error;

/// Errors raised while reading from or writing back to a review store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceError {
    #[error("scan of table {table} failed: {reason}")]
    Scan { table: String, reason: String },

    #[error("invalid continuation token: {0}")]
    InvalidToken(String),

    #[error("store file I/O failed: {0}")]
    Io(String),

    #[error("malformed store document: {0}")]
    Decode(String),

    #[error("no item with {key_field} = {key}")]
    MissingItem { key_field: String, key: String },

    #[error("store backend error: {0}")]
    Backend(String),
}

impl SourceError {
    pub fn scan(table: impl Into<String>, reason: impl Into<String>) -> Self {
        SourceError::Scan {
            table: table.into(),
            reason: reason.into(),
        }
    }

    pub fn backend(reason: impl Into<String>) -> Self {
        SourceError::Backend(reason.into())
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Decode(err.to_string())
    }
}
