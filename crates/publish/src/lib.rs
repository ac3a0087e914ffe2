//! Publishing of review analytics artifacts.
//!
//! Everything the pipeline produces ends up in an [`ArtifactSink`]: the
//! flattened export table and its BI manifest, and the rendered charts. The
//! sink is a small object-store contract (`put`, `list`, `presign`) with two
//! local implementations:
//!
//! - [`InMemorySink`] keeps objects in a locked map and is what the tests use.
//! - [`FsSink`] mirrors a bucket as a directory tree and hands out
//!   `file://` links.
//!
//! [`export`] normalizes and flattens the records, writes the table, then
//! writes a manifest pointing at it. [`VisualLookup`] finds a chart by
//! file-name prefix and presigns it.
//!
//! ```
//! use publish::{export, ArtifactSink, ExportTarget, InMemorySink, ManifestBuilder};
//! use records::Record;
//!
//! let sink = InMemorySink::new("exports");
//! let target = ExportTarget::new("reviews_export.json", "reviews_export.manifest");
//! let records = vec![Record::new().with("id", "r-1")];
//!
//! let report = export(&records, &ManifestBuilder::new(), &sink, &target).unwrap();
//! assert_eq!(report.count, 1);
//! assert_eq!(report.data_location, "s3://exports/reviews_export.json");
//! assert_eq!(sink.list("").unwrap().len(), 2);
//! ```

mod error;
mod export;
mod fs;
mod manifest;
mod sink;
mod visuals;

pub use crate::error::{ExportError, SinkError, VisualError};
pub use crate::export::{
    export, export_rows, flatten_all, ExportReport, ExportTarget, JSON_CONTENT_TYPE,
};
pub use crate::fs::FsSink;
pub use crate::manifest::{FileLocation, Manifest, ManifestBuilder, UploadSettings};
pub use crate::sink::{ArtifactSink, InMemorySink, StoredObject};
pub use crate::visuals::{Visual, VisualLookup, DEFAULT_CHARTS_PREFIX, DEFAULT_PRESIGN_TTL_SECS};
