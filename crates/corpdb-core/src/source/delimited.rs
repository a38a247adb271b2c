// crates/corpdb-core/src/source/delimited.rs

use super::{RowIter, RowSet};
use crate::error::{CorpError, Result};
use crate::model::Row;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// Streaming reader over a delimited-text file. Lines are read one at a
/// time; the whole file is never held in memory.
pub struct DelimitedRows {
    headers: Vec<String>,
    lines: Lines<BufReader<File>>,
    file: String,
}

pub(super) fn open(path: &Path) -> Result<RowSet> {
    let file = File::open(path).map_err(|e| {
        CorpError::NotFound(format!("Corpus file not found at {}: {}", path.display(), e))
    })?;

    let mut lines = BufReader::new(file).lines();
    let header_line = match lines.next() {
        Some(line) => line?,
        None => {
            return Err(CorpError::Parse {
                file: path.display().to_string(),
                reason: "empty file, no header row".into(),
            })
        }
    };

    let headers = split_line(&header_line);
    Ok(RowSet {
        headers: headers.clone(),
        rows: RowIter::Delimited(DelimitedRows {
            headers,
            lines,
            file: path.display().to_string(),
        }),
    })
}

impl Iterator for DelimitedRows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    // A read failure mid-file ends the stream; the rows
                    // already yielded stay valid.
                    tracing::warn!(file = %self.file, error = %e, "read failed mid-stream");
                    return None;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = split_line(&line);
            // Align to the header: pad short rows, drop trailing extras.
            fields.resize(self.headers.len(), String::new());
            return Some(
                self.headers
                    .iter()
                    .cloned()
                    .zip(fields)
                    .collect(),
            );
        }
    }
}

/// Minimal quoted-field-aware split.
///
/// A comma outside a double-quoted region separates fields; a double quote
/// toggles the quoted state and is stripped from the output; each field is
/// whitespace-trimmed. Known limitation: escaped quotes inside quoted
/// fields (`""`) are not unescaped; both characters are dropped.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}
