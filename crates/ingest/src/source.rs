//! Store-facing scan contract.
//!
//! A store hands back one page per `scan` call together with an opaque
//! continuation token. Passing that token into the next call continues the
//! scan; a page without a token is the last one.

use std::fmt;

use records::{Record, RecordValue};

use crate::error::SourceError;

/// Opaque position issued by a store. Only the issuing store interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a single scan call.
#[derive(Clone, Debug, Default)]
pub struct ScanPage {
    pub records: Vec<Record>,
    /// Token for the next page; `None` ends the scan.
    pub next: Option<ContinuationToken>,
}

impl ScanPage {
    pub fn last(records: Vec<Record>) -> Self {
        Self {
            records,
            next: None,
        }
    }

    pub fn with_next(records: Vec<Record>, next: ContinuationToken) -> Self {
        Self {
            records,
            next: Some(next),
        }
    }
}

/// Read side of a review table.
pub trait ReviewSource: Send + Sync {
    /// Table or collection name, used in logs and errors.
    fn table(&self) -> &str;

    /// Fetch one page, starting from `start` (or the beginning when `None`).
    fn scan(&self, start: Option<&ContinuationToken>) -> Result<ScanPage, SourceError>;
}

/// A review table that also accepts field updates.
pub trait ReviewStore: ReviewSource {
    /// Set `field` on the item whose `key_field` equals `key`.
    fn set_field(
        &self,
        key_field: &str,
        key: &str,
        field: &str,
        value: RecordValue,
    ) -> Result<(), SourceError>;

    /// Set `field` on every item named in `updates`, keyed by `key_field`.
    ///
    /// The default applies updates one at a time and stops at the first
    /// failure, keeping earlier writes. Stores that can write a whole batch
    /// at once override it.
    fn set_fields(
        &self,
        key_field: &str,
        field: &str,
        updates: Vec<(String, RecordValue)>,
    ) -> Result<usize, SourceError> {
        let count = updates.len();
        for (key, value) in updates {
            self.set_field(key_field, &key, field, value)?;
        }
        Ok(count)
    }
}

/// Offset-based paging shared by the local stores.
///
/// Tokens are the decimal offset of the next unread record.
pub(crate) fn page_from_slice(
    records: &[Record],
    start: Option<&ContinuationToken>,
    page_size: usize,
) -> Result<ScanPage, SourceError> {
    let offset = match start {
        None => 0,
        Some(token) => token
            .as_str()
            .parse::<usize>()
            .ok()
            .filter(|offset| *offset <= records.len())
            .ok_or_else(|| SourceError::InvalidToken(token.to_string()))?,
    };

    let end = offset.saturating_add(page_size.max(1)).min(records.len());
    let page = records[offset..end].to_vec();
    if end < records.len() {
        Ok(ScanPage::with_next(page, ContinuationToken::new(end.to_string())))
    } else {
        Ok(ScanPage::last(page))
    }
}

/// Locate the item whose `key_field` text equals `key`.
pub(crate) fn position_of(records: &[Record], key_field: &str, key: &str) -> Option<usize> {
    records
        .iter()
        .position(|record| record.text(key_field) == Some(key))
}
