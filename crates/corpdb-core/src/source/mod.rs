// crates/corpdb-core/src/source/mod.rs

//! # Row Source Adapter
//!
//! Uniform interface over the supported corpus file formats. Each backend
//! yields ordered rows of (column label, value) pairs, in file order, with
//! the header row excluded. Format libraries are treated as black boxes
//! behind this module; nothing outside it knows how a file is parsed.

use crate::error::{CorpError, Result};
use crate::model::Row;
use std::path::Path;

mod delimited;
mod json;
mod sheet;

pub use delimited::split_line;

/// The rows of one opened source file.
pub struct RowSet {
    /// Column labels from the header row (or first record).
    pub headers: Vec<String>,
    pub rows: RowIter,
}

/// Iterator over data rows; streaming for delimited text, pre-parsed for
/// the batch backends.
pub enum RowIter {
    Delimited(delimited::DelimitedRows),
    Batch(std::vec::IntoIter<Row>),
}

impl Iterator for RowIter {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        match self {
            RowIter::Delimited(r) => r.next(),
            RowIter::Batch(r) => r.next(),
        }
    }
}

/// Opens `path` with the backend matching its extension.
///
/// Delimited text streams line by line; spreadsheet and JSON files are
/// parsed whole (first sheet / top-level array only).
pub fn open(path: &Path) -> Result<RowSet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => delimited::open(path),
        "xlsx" | "xls" => sheet::open(path),
        "json" => json::open(path),
        other => Err(CorpError::Parse {
            file: path.display().to_string(),
            reason: format!("unsupported extension: {other:?}"),
        }),
    }
}
