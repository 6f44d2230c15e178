//! Raw snapshot files handed over by the acquisition side

#![allow(clippy::result_large_err)]

use std::fs;
use std::path::Path;

use rollcall_core::model::RecordSet;

use crate::errors::{in_file, io_error, Result};

/// Read a TSV snapshot, one record per line, in any supported schema
///
/// Business-key duplicates inside the file collapse to their first
/// occurrence.
///
/// # Errors
///
/// Returns `NotFound`/`Io` if the file cannot be read and `Parse` (with
/// path and line) for malformed lines.
pub fn read_snapshot(path: &Path) -> Result<RecordSet> {
    let text = fs::read_to_string(path).map_err(|e| io_error("read_snapshot", path, e))?;
    RecordSet::parse(&text).map_err(|e| in_file("read_snapshot", path, e))
}
