use records::{flatten, normalize_record, FlatRecord, Record, TransformError};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ExportError;
use crate::manifest::ManifestBuilder;
use crate::sink::ArtifactSink;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Where an export writes its two objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub data_key: String,
    pub manifest_key: String,
}

impl ExportTarget {
    pub fn new(data_key: impl Into<String>, manifest_key: impl Into<String>) -> Self {
        Self {
            data_key: data_key.into(),
            manifest_key: manifest_key.into(),
        }
    }
}

/// Outcome of a completed export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub data_location: String,
    pub manifest_location: String,
    pub count: usize,
}

/// Normalize then flatten every record, stopping at the first failure.
pub fn flatten_all(records: &[Record]) -> Result<Vec<FlatRecord>, TransformError> {
    records
        .iter()
        .map(|record| flatten(&normalize_record(record.clone())))
        .collect()
}

/// Write `records` as a flat JSON table plus a manifest describing it.
///
/// The transform runs to completion before anything is written. The data
/// object is written first; if the manifest write then fails the data
/// object stays where it is and the error says so.
pub fn export(
    records: &[Record],
    manifest: &ManifestBuilder,
    sink: &dyn ArtifactSink,
    target: &ExportTarget,
) -> Result<ExportReport, ExportError> {
    let rows = flatten_all(records)?;
    export_rows(&rows, manifest, sink, target)
}

/// Write already-flattened rows and their manifest.
pub fn export_rows(
    rows: &[FlatRecord],
    manifest: &ManifestBuilder,
    sink: &dyn ArtifactSink,
    target: &ExportTarget,
) -> Result<ExportReport, ExportError> {
    let body = serde_json::to_vec_pretty(&rows).map_err(|err| ExportError::Serialize {
        what: "data",
        reason: err.to_string(),
    })?;

    let data_location = sink.object_uri(&target.data_key);
    sink.put(&target.data_key, &body, JSON_CONTENT_TYPE)
        .map_err(|err| {
            warn!(location = %data_location, error = %err, "export_data_failed");
            ExportError::DataWrite(err)
        })?;

    let manifest_location = sink.object_uri(&target.manifest_key);
    let manifest_body = manifest.build(data_location.clone()).to_json_pretty()?;
    if let Err(err) = sink.put(&target.manifest_key, &manifest_body, JSON_CONTENT_TYPE) {
        warn!(
            location = %manifest_location,
            data_location = %data_location,
            error = %err,
            "export_manifest_failed"
        );
        return Err(ExportError::ManifestWrite {
            data_location,
            source: err,
        });
    }

    info!(
        data_location = %data_location,
        manifest_location = %manifest_location,
        count = rows.len(),
        "export_success"
    );
    Ok(ExportReport {
        data_location,
        manifest_location,
        count: rows.len(),
    })
}
