use std::time::Instant;

use records::Record;
use tracing::{debug, info, warn};

use crate::error::SourceError;
use crate::source::ReviewSource;

/// Read every record from `source`, following continuation tokens until the
/// store returns a page without one.
///
/// Any failed page aborts the whole collection: no partial result is
/// returned and nothing is retried. Records are returned in page order.
pub fn collect_all(source: &dyn ReviewSource) -> Result<Vec<Record>, SourceError> {
    let start = Instant::now();
    let table = source.table();
    let mut records = Vec::new();
    let mut token = None;
    let mut pages = 0usize;

    loop {
        let page = match source.scan(token.as_ref()) {
            Ok(page) => page,
            Err(err) => {
                warn!(
                    table = %table,
                    pages_read = pages,
                    error = %err,
                    "collect_failure"
                );
                return Err(err);
            }
        };
        pages += 1;
        debug!(
            table = %table,
            page = pages,
            page_len = page.records.len(),
            has_more = page.next.is_some(),
            "collect_page"
        );

        records.extend(page.records);
        match page.next {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    info!(
        table = %table,
        pages,
        records = records.len(),
        elapsed_micros = start.elapsed().as_micros(),
        "collect_complete"
    );
    Ok(records)
}
