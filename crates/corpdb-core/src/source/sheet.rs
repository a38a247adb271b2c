// crates/corpdb-core/src/source/sheet.rs

use super::{RowIter, RowSet};
use crate::error::{CorpError, Result};
use crate::model::Row;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Batch reader for spreadsheet containers (.xlsx / .xls).
///
/// The whole first sheet is parsed up front; the first row is taken as the
/// header and every following row is labeled by it.
pub(super) fn open(path: &Path) -> Result<RowSet> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CorpError::Parse {
            file: path.display().to_string(),
            reason: "workbook has no sheets".into(),
        })??;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(cell_to_string).collect(),
        None => {
            return Err(CorpError::Parse {
                file: path.display().to_string(),
                reason: "first sheet is empty".into(),
            })
        }
    };

    let data: Vec<Row> = rows
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    let value = cells.get(i).map(cell_to_string).unwrap_or_default();
                    (label.clone(), value)
                })
                .collect()
        })
        .collect();

    Ok(RowSet {
        headers,
        rows: RowIter::Batch(data.into_iter()),
    })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        // Integral floats are common for identifier columns; render them
        // without the trailing ".0" a plain Display would produce.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}
