use thiserror::Error;

/// Errors raised while building, normalizing, or flattening records.
///
/// Normalization itself never fails; these surface from decimal parsing at
/// construction time and from the flattener's depth guard.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransformError {
    #[error("invalid decimal literal: {0:?}")]
    InvalidDecimal(String),
    #[error("record nesting depth {depth} exceeds limit {limit}")]
    DepthExceeded { depth: usize, limit: usize },
    #[error("failed to encode sequence as JSON: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for TransformError {
    fn from(err: serde_json::Error) -> Self {
        TransformError::Encode(err.to_string())
    }
}
