//! Workspace umbrella crate for the review analytics pipeline.
//!
//! This crate wires the stage crates together so callers can run an
//! invocation with a single entry point:
//!
//! - **export** - collect every review, normalize and flatten it, write the
//!   table and a BI manifest to the export sink.
//! - **charts** - collect, aggregate word frequency against sentiment, render
//!   the scatter and histogram charts and publish them to the chart sink.
//! - **enrich** - label reviews with a [`SentimentClassifier`] and write the
//!   label back to the store.
//! - **visual** - find a published chart by name and hand out a presigned
//!   link.
//!
//! Stores and sinks are passed in, never looked up globally, so every path
//! runs the same against the local backends used in tests and by the CLI.
//!
//! Failures are reported as a [`PipelineError`], which maps onto a small
//! fixed set of [`ErrorCategory`] values. [`InvocationResponse`] turns either
//! outcome into the structured result the CLI prints.

pub mod config;
mod enrich;
mod pipeline;
mod response;

pub use analytics::{
    AggregateConfig, ChartFormat, ChartRenderer, RenderError, SentimentClassifier,
    SentimentLabel, VaderClassifier,
};
pub use ingest::{
    collect_all, InMemoryReviewStore, JsonFileStore, ReviewSource, ReviewStore, SourceError,
};
pub use publish::{
    ArtifactSink, ExportError, ExportReport, ExportTarget, FsSink, InMemorySink,
    ManifestBuilder, SinkError, Visual, VisualError, VisualLookup,
};
pub use records::{Record, RecordValue, TransformError};

pub use crate::config::{ConfigError, PipelineConfig};
pub use crate::enrich::{enrich_sentiment, EnrichReport};
pub use crate::pipeline::{ChartOutcome, ChartReport, Pipeline, PipelineSettings, RunReport};
pub use crate::response::{ErrorBody, ErrorDetail, InvocationResponse};

use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that can end a pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("review source failure: {0}")]
    Source(#[from] SourceError),

    #[error("record transform failure: {0}")]
    Transform(#[from] TransformError),

    #[error("export failure: {0}")]
    Export(#[from] ExportError),

    #[error("sink failure: {0}")]
    Sink(#[from] SinkError),

    #[error("chart rendering failure: {0}")]
    Render(#[from] RenderError),

    #[error("visual lookup failure: {0}")]
    Visual(#[from] VisualError),
}

/// Coarse failure classes reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    SourceUnavailable,
    TransformError,
    SinkWriteError,
    RenderError,
    InvalidRequest,
    NotFound,
}

impl ErrorCategory {
    pub fn code(self) -> &'static str {
        match self {
            ErrorCategory::SourceUnavailable => "SOURCE_UNAVAILABLE",
            ErrorCategory::TransformError => "TRANSFORM_ERROR",
            ErrorCategory::SinkWriteError => "SINK_WRITE_ERROR",
            ErrorCategory::RenderError => "RENDER_ERROR",
            ErrorCategory::InvalidRequest => "INVALID_REQUEST",
            ErrorCategory::NotFound => "NOT_FOUND",
        }
    }

    /// Fixed diagnostic shown to callers; the underlying error goes in the
    /// detail field.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCategory::SourceUnavailable => "Failed to read records from the review store.",
            ErrorCategory::TransformError => "Failed to process review records.",
            ErrorCategory::SinkWriteError => "Failed to write artifacts to storage.",
            ErrorCategory::RenderError => "Failed to render chart.",
            ErrorCategory::InvalidRequest => "Missing ?file= param",
            ErrorCategory::NotFound => "No matching object for prefix.",
        }
    }

    pub fn status(self) -> u16 {
        match self {
            ErrorCategory::InvalidRequest => 400,
            ErrorCategory::NotFound => 404,
            ErrorCategory::SourceUnavailable
            | ErrorCategory::TransformError
            | ErrorCategory::SinkWriteError
            | ErrorCategory::RenderError => 500,
        }
    }
}

impl PipelineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PipelineError::Source(_) => ErrorCategory::SourceUnavailable,
            PipelineError::Transform(_) => ErrorCategory::TransformError,
            PipelineError::Export(ExportError::Transform(_) | ExportError::Serialize { .. }) => {
                ErrorCategory::TransformError
            }
            PipelineError::Export(_) | PipelineError::Sink(_) => ErrorCategory::SinkWriteError,
            PipelineError::Render(_) => ErrorCategory::RenderError,
            PipelineError::Visual(VisualError::MissingFileParam) => ErrorCategory::InvalidRequest,
            PipelineError::Visual(VisualError::NotFound { .. }) => ErrorCategory::NotFound,
            PipelineError::Visual(_) => ErrorCategory::SinkWriteError,
        }
    }
}

/// Metrics observer for pipeline stages.
///
/// Collect covers paging through the store, transform covers normalize,
/// flatten, aggregation and rendering, publish covers every sink write.
pub trait PipelineMetrics: Send + Sync {
    fn record_collect(&self, latency: Duration, result: Result<usize, SourceError>);
    fn record_transform(&self, latency: Duration, result: Result<(), PipelineError>);
    fn record_publish(&self, latency: Duration, result: Result<(), PipelineError>);
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start(recorder: Option<&Arc<dyn PipelineMetrics>>) -> Option<Self> {
        recorder.map(|recorder| Self {
            recorder: Arc::clone(recorder),
            start: Instant::now(),
        })
    }

    pub(crate) fn record_collect(self, result: Result<usize, SourceError>) {
        self.recorder.record_collect(self.start.elapsed(), result);
    }

    pub(crate) fn record_transform(self, result: Result<(), PipelineError>) {
        self.recorder.record_transform(self.start.elapsed(), result);
    }

    pub(crate) fn record_publish(self, result: Result<(), PipelineError>) {
        self.recorder.record_publish(self.start.elapsed(), result);
    }
}
