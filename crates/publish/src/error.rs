use records::TransformError;
use thiserror::Error;

/// Failures reported by an [`ArtifactSink`](crate::ArtifactSink).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SinkError {
    #[error("write of {bucket}/{key} failed: {reason}")]
    Write {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("listing {bucket}/{prefix} failed: {reason}")]
    List {
        bucket: String,
        prefix: String,
        reason: String,
    },

    #[error("object {bucket}/{key} does not exist")]
    MissingObject { bucket: String, key: String },

    #[error("invalid object key {0:?}")]
    InvalidKey(String),

    #[error("sink backend error: {0}")]
    Backend(String),
}

impl SinkError {
    pub fn write(bucket: &str, key: &str, reason: impl ToString) -> Self {
        SinkError::Write {
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn list(bucket: &str, prefix: &str, reason: impl ToString) -> Self {
        SinkError::List {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn missing(bucket: &str, key: &str) -> Self {
        SinkError::MissingObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }

    pub fn backend(reason: impl Into<String>) -> Self {
        SinkError::Backend(reason.into())
    }
}

/// Export failures. Nothing is written when the transform step fails; a
/// manifest failure leaves the data object in place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExportError {
    #[error("record transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("failed to serialize {what}: {reason}")]
    Serialize { what: &'static str, reason: String },

    #[error("data write failed: {0}")]
    DataWrite(#[source] SinkError),

    #[error("manifest write failed after data was written to {data_location}: {source}")]
    ManifestWrite {
        data_location: String,
        #[source]
        source: SinkError,
    },
}

/// Chart lookup failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VisualError {
    #[error("missing file parameter")]
    MissingFileParam,

    #[error("no visual matches {prefix}")]
    NotFound { prefix: String },

    #[error(transparent)]
    Sink(#[from] SinkError),
}
