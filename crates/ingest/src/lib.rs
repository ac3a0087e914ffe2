//! Review store access.
//!
//! This is where records enter the pipeline. A store exposes paged scans
//! through [`ReviewSource`]; [`collect_all`] drives those scans to the end
//! and hands back the full record set. Both the export path and the
//! analytics path start here.
//!
//! ## What we provide
//!
//! - **The scan contract** - [`ReviewSource::scan`] takes an optional
//!   [`ContinuationToken`] and returns a [`ScanPage`]. No token on the page
//!   means the table is exhausted.
//! - **The collector** - [`collect_all`] follows tokens until exhaustion.
//!   One failed page fails the collection; there are no retries.
//! - **Write-back** - [`ReviewStore`] adds single-field updates, used to
//!   attach sentiment labels.
//! - **Local stores** - [`InMemoryReviewStore`] for tests and
//!   [`JsonFileStore`] for running against a file on disk.
//!
//! Concurrent writers mutating a table mid-scan may cause records to be
//! skipped or seen twice; that is store behavior and is not corrected here.
//!
//! ## Example
//!
//! ```
//! use ingest::{collect_all, InMemoryReviewStore};
//! use records::Record;
//!
//! let store = InMemoryReviewStore::new("Reviews")
//!     .with_records(vec![
//!         Record::new().with("review_id", "a"),
//!         Record::new().with("review_id", "b"),
//!         Record::new().with("review_id", "c"),
//!     ])
//!     .with_page_size(2);
//!
//! let records = collect_all(&store).unwrap();
//! assert_eq!(records.len(), 3);
//! assert_eq!(store.scan_calls(), 2);
//! ```

mod collect;
mod error;
mod file;
mod memory;
mod source;

pub use crate::collect::collect_all;
pub use crate::error::SourceError;
pub use crate::file::JsonFileStore;
pub use crate::memory::{InMemoryReviewStore, DEFAULT_PAGE_SIZE};
pub use crate::source::{ContinuationToken, ReviewSource, ReviewStore, ScanPage};
