use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use records::{Record, RecordValue};

use crate::error::SourceError;
use crate::source::{page_from_slice, position_of, ContinuationToken, ReviewSource, ReviewStore, ScanPage};

/// Default number of records returned per scan call.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// An in-memory review table using a `RwLock` around a `Vec`.
///
/// Useful for tests: it counts scan calls and can be told to fail from a
/// given call onwards.
pub struct InMemoryReviewStore {
    table: String,
    page_size: usize,
    records: RwLock<Vec<Record>>,
    scan_calls: AtomicUsize,
    fail_from_call: Option<usize>,
}

impl InMemoryReviewStore {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            page_size: DEFAULT_PAGE_SIZE,
            records: RwLock::new(Vec::new()),
            scan_calls: AtomicUsize::new(0),
            fail_from_call: None,
        }
    }

    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = RwLock::new(records);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Make the `call`-th scan (zero-based) and every later one fail.
    pub fn failing_from(mut self, call: usize) -> Self {
        self.fail_from_call = Some(call);
        self
    }

    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::Relaxed)
    }

    /// Snapshot of the current table contents.
    pub fn records(&self) -> Result<Vec<Record>, SourceError> {
        let guard = self
            .records
            .read()
            .map_err(|_| SourceError::backend("poisoned lock"))?;
        Ok(guard.clone())
    }

    pub fn insert(&self, record: Record) -> Result<(), SourceError> {
        self.records
            .write()
            .map_err(|_| SourceError::backend("poisoned lock"))?
            .push(record);
        Ok(())
    }
}

impl ReviewSource for InMemoryReviewStore {
    fn table(&self) -> &str {
        &self.table
    }

    fn scan(&self, start: Option<&ContinuationToken>) -> Result<ScanPage, SourceError> {
        let call = self.scan_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_from_call.is_some_and(|from| call >= from) {
            return Err(SourceError::scan(&self.table, "store unavailable"));
        }

        // The read lock is held for the duration of the page copy.
        let guard = self
            .records
            .read()
            .map_err(|_| SourceError::backend("poisoned lock"))?;
        page_from_slice(&guard, start, self.page_size)
    }
}

impl ReviewStore for InMemoryReviewStore {
    fn set_field(
        &self,
        key_field: &str,
        key: &str,
        field: &str,
        value: RecordValue,
    ) -> Result<(), SourceError> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| SourceError::backend("poisoned lock"))?;
        let idx = position_of(&guard, key_field, key).ok_or_else(|| SourceError::MissingItem {
            key_field: key_field.to_string(),
            key: key.to_string(),
        })?;
        guard[idx].insert(field, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::collect_all;

    fn reviews(count: usize) -> Vec<Record> {
        (0..count)
            .map(|idx| {
                Record::new()
                    .with("review_id", format!("r-{idx}"))
                    .with("text", "tasty")
            })
            .collect()
    }

    #[test]
    fn collector_visits_every_record_once() {
        let store = InMemoryReviewStore::new("Reviews")
            .with_records(reviews(7))
            .with_page_size(3);

        let collected = collect_all(&store).unwrap();

        assert_eq!(collected.len(), 7);
        assert_eq!(store.scan_calls(), 3);
        let ids: Vec<_> = collected.iter().filter_map(|r| r.text("review_id")).collect();
        assert_eq!(ids, vec!["r-0", "r-1", "r-2", "r-3", "r-4", "r-5", "r-6"]);
    }

    #[test]
    fn failing_store_surfaces_scan_error() {
        let store = InMemoryReviewStore::new("Reviews")
            .with_records(reviews(4))
            .with_page_size(2)
            .failing_from(1);

        let err = collect_all(&store).unwrap_err();
        assert_eq!(err, SourceError::scan("Reviews", "store unavailable"));
    }

    #[test]
    fn set_field_updates_matching_item() {
        let store = InMemoryReviewStore::new("Reviews").with_records(reviews(2));
        store
            .set_field("review_id", "r-1", "sentiment", RecordValue::from("POSITIVE"))
            .unwrap();

        let snapshot = store.records().unwrap();
        assert_eq!(snapshot[1].text("sentiment"), Some("POSITIVE"));
        assert_eq!(snapshot[0].text("sentiment"), None);

        let err = store
            .set_field("review_id", "missing", "sentiment", RecordValue::Null)
            .unwrap_err();
        assert!(matches!(err, SourceError::MissingItem { .. }));
    }
}
