//! Log-to-memory reconciliation
//!
//! Runs at the top of every create and update while the write lock is held.
//! Rows from the log are upserted into the store; records that exist only in
//! memory are left alone. A missing log file means no data has been written
//! yet and is not an error.
//!
//! The first row is skipped only when it actually reads `ID,Name`; a log
//! written without a header (or emptied by hand) loses no records.

use tracing::{debug, warn};

use super::codec;
use super::durable_log::DurableLog;
use super::errors::LogResult;
use super::record_store::RecordStore;
use crate::observability::Event;

/// Summary of one reload pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Rows read from the log, header included
    pub rows: usize,
    /// Records upserted into the store
    pub loaded: usize,
    /// Data rows that could not be interpreted
    pub skipped: usize,
}

/// Reload the durable log into `store`
pub fn sync_from_log(log: &DurableLog, store: &mut RecordStore) -> LogResult<ReloadReport> {
    let rows = match log.read_all() {
        Ok(rows) => rows,
        Err(e) if e.is_not_found() => {
            debug!(event = %Event::LogMissing, path = %log.path().display(), "no log yet");
            return Ok(ReloadReport::default());
        }
        Err(e) => return Err(e),
    };

    let mut report = ReloadReport {
        rows: rows.len(),
        ..ReloadReport::default()
    };
    for (index, row) in rows.iter().enumerate() {
        if index == 0 && codec::is_header_row(row) {
            continue;
        }
        match codec::row_to_person(row) {
            Some(Ok(person)) => match store.put(person) {
                Ok(()) => report.loaded += 1,
                Err(e) => {
                    warn!(event = %Event::RowSkipped, row = index, reason = %e, "skipping log row");
                    report.skipped += 1;
                }
            },
            Some(Err(reason)) => {
                warn!(event = %Event::RowSkipped, row = index, %reason, "skipping log row");
                report.skipped += 1;
            }
            None => {
                warn!(event = %Event::RowSkipped, row = index, reason = "too few fields", "skipping log row");
                report.skipped += 1;
            }
        }
    }

    debug!(
        event = %Event::LogLoaded,
        loaded = report.loaded,
        skipped = report.skipped,
        next_id = store.peek_next_id(),
        "log reloaded"
    );
    Ok(report)
}
