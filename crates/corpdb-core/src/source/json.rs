// crates/corpdb-core/src/source/json.rs

use super::{RowIter, RowSet};
use crate::error::{CorpError, Result};
use crate::model::Row;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Batch reader for JSON corpus files: a top-level array of flat objects.
/// Column labels come from the first object's keys.
pub(super) fn open(path: &Path) -> Result<RowSet> {
    let file = File::open(path).map_err(|e| {
        CorpError::NotFound(format!("Corpus file not found at {}: {}", path.display(), e))
    })?;
    let objects: Vec<Map<String, Value>> = serde_json::from_reader(BufReader::new(file))?;

    let headers: Vec<String> = objects
        .first()
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default();

    let data: Vec<Row> = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|label| {
                    let value = obj.get(label).map(value_to_string).unwrap_or_default();
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

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}
