//! JSON-file review table.
//!
//! The file holds a JSON array of objects. It is loaded once at open time
//! and paged from memory; write-backs rewrite the whole file, so a batch of
//! updates is applied to a copy and written once. Numbers are read as stored
//! decimals and written back with the same digits.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use records::{Record, RecordValue};
use tracing::debug;

use crate::error::SourceError;
use crate::memory::DEFAULT_PAGE_SIZE;
use crate::source::{page_from_slice, ContinuationToken, ReviewSource, ReviewStore, ScanPage};

pub struct JsonFileStore {
    table: String,
    path: PathBuf,
    page_size: usize,
    records: RwLock<Vec<Record>>,
}

impl JsonFileStore {
    /// Load the table stored at `path`.
    pub fn open(table: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let bytes = fs::read(&path)
            .map_err(|err| SourceError::Io(format!("{}: {err}", path.display())))?;
        let records: Vec<Record> = serde_json::from_slice(&bytes)?;
        let table = table.into();
        debug!(table = %table, path = %path.display(), records = records.len(), "store_opened");

        Ok(Self {
            table,
            path,
            page_size: DEFAULT_PAGE_SIZE,
            records: RwLock::new(records),
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &[Record]) -> Result<(), SourceError> {
        let body = serde_json::to_vec_pretty(records)?;
        fs::write(&self.path, body)
            .map_err(|err| SourceError::Io(format!("{}: {err}", self.path.display())))
    }
}

impl ReviewSource for JsonFileStore {
    fn table(&self) -> &str {
        &self.table
    }

    fn scan(&self, start: Option<&ContinuationToken>) -> Result<ScanPage, SourceError> {
        let guard = self
            .records
            .read()
            .map_err(|_| SourceError::backend("poisoned lock"))?;
        page_from_slice(&guard, start, self.page_size)
    }
}

impl ReviewStore for JsonFileStore {
    fn set_field(
        &self,
        key_field: &str,
        key: &str,
        field: &str,
        value: RecordValue,
    ) -> Result<(), SourceError> {
        self.set_fields(key_field, field, vec![(key.to_string(), value)])
            .map(|_| ())
    }

    /// Applies the whole batch or none of it. The file is written once and
    /// the in-memory table only changes after that write succeeds.
    fn set_fields(
        &self,
        key_field: &str,
        field: &str,
        updates: Vec<(String, RecordValue)>,
    ) -> Result<usize, SourceError> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| SourceError::backend("poisoned lock"))?;

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(guard.len());
        for (idx, record) in guard.iter().enumerate() {
            if let Some(key) = record.text(key_field) {
                index.entry(key).or_insert(idx);
            }
        }
        let mut targets = Vec::with_capacity(updates.len());
        for (key, value) in updates {
            let idx = *index.get(key.as_str()).ok_or_else(|| SourceError::MissingItem {
                key_field: key_field.to_string(),
                key: key.clone(),
            })?;
            targets.push((idx, value));
        }
        drop(index);

        let mut next = guard.clone();
        let count = targets.len();
        for (idx, value) in targets {
            next[idx].insert(field, value);
        }
        self.persist(&next)?;
        *guard = next;

        debug!(table = %self.table, field, updated = count, "store_fields_written");
        Ok(count)
    }
}
