use analytics::{review_text, SentimentClassifier, SENTIMENT_FIELD};
use ingest::{collect_all, ReviewStore};
use records::RecordValue;
use serde::Serialize;
use tracing::{info, warn};

use crate::PipelineError;

/// Counts from one enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichReport {
    pub updated: usize,
    pub skipped: usize,
}

/// Label every review in `store` and write the label back.
///
/// Reviews without text are classified as the empty string. A review whose
/// `key_field` is missing or not text cannot be addressed for the update and
/// is skipped. Labels go back to the store as one batch; whether a failed
/// batch keeps earlier writes is up to the store.
pub fn enrich_sentiment<S: ReviewStore>(
    store: &S,
    classifier: &dyn SentimentClassifier,
    key_field: &str,
) -> Result<EnrichReport, PipelineError> {
    let records = collect_all(store)?;
    let mut report = EnrichReport::default();
    let mut updates = Vec::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        let Some(key) = record.text(key_field) else {
            warn!(
                table = store.table(),
                position,
                key_field,
                "enrich_missing_key"
            );
            report.skipped += 1;
            continue;
        };
        let label = classifier.classify(review_text(record).unwrap_or(""));
        updates.push((key.to_string(), RecordValue::from(label.as_str())));
    }
    report.updated = store.set_fields(key_field, SENTIMENT_FIELD, updates)?;

    info!(
        table = store.table(),
        updated = report.updated,
        skipped = report.skipped,
        "enrich_complete"
    );
    Ok(report)
}
