// crates/corpdb-core/src/search.rs

//! # Search Engine
//!
//! Phase one matches the query against the resident index; phase two
//! re-reads only the matched rows from their source files, grouped per
//! file so each file is reopened at most once.

use crate::config::{MATCH_CAP, MIN_QUERY_LEN};
use crate::error::Result;
use crate::extract::FieldBindings;
use crate::index::CorpusIndex;
use crate::model::{IndexRecord, ResultRow};
use crate::source;
use std::path::Path;

impl CorpusIndex {
    /// Linear scan in index order for records whose name or identifier
    /// contains `query` (case-folded).
    ///
    /// Scanning stops at [`MATCH_CAP`] matches. This is a hard cap, not a
    /// ranked top-N: later records are never considered, so results are
    /// biased toward earlier-indexed files and rows.
    pub fn find_matches(&self, query: &str) -> Vec<&IndexRecord> {
        let q = query.trim().to_lowercase();
        if q.len() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let mut out = Vec::new();
        for record in &self.records {
            if record.name_lower.contains(&q) || record.identifier.to_lowercase().contains(&q) {
                out.push(record);
                if out.len() >= MATCH_CAP {
                    break;
                }
            }
        }
        out
    }
}

/// Runs both phases: match against the index, then resolve full rows from
/// disk. Queries shorter than [`MIN_QUERY_LEN`] return empty without
/// touching the index.
pub fn search(index: &CorpusIndex, data_dir: &Path, query: &str) -> Result<Vec<ResultRow>> {
    let matches = index.find_matches(query);
    if matches.is_empty() {
        return Ok(Vec::new());
    }
    Ok(resolve_details(data_dir, &matches))
}

/// Re-reads matched rows, one pass per source file.
///
/// Grouping preserves the order files were first matched in, and rows
/// within a file come back in file order; neither is a relevance
/// ranking. A file that fails to reopen is logged and its matches are
/// dropped from the result (partial result, not a failed query).
fn resolve_details(data_dir: &Path, matches: &[&IndexRecord]) -> Vec<ResultRow> {
    // Insertion-ordered grouping keeps result order reproducible; a plain
    // HashMap iteration would not.
    let mut groups: Vec<(&str, Vec<u32>)> = Vec::new();
    for record in matches {
        match groups.iter_mut().find(|(f, _)| *f == record.source_file) {
            Some((_, offsets)) => offsets.push(record.row_offset),
            None => groups.push((&record.source_file, vec![record.row_offset])),
        }
    }

    let mut results = Vec::new();
    for (file, offsets) in &groups {
        let path = data_dir.join(file);
        let set = match source::open(&path) {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "detail resolution skipped file");
                continue;
            }
        };
        let bindings = FieldBindings::resolve(&set.headers);

        let mut offset: u32 = 0;
        for row in set.rows {
            if offsets.contains(&offset) {
                let fields = bindings.extract(&row);
                results.push(ResultRow {
                    id: row_id(file, offset),
                    name: fields.name,
                    region: fields.region,
                    identifier: fields.identifier,
                    status: fields.status,
                    columns: row,
                });
            }
            offset += 1;
        }
    }
    results
}

/// Deterministic row id from the locator.
fn row_id(file: &str, offset: u32) -> String {
    let stem = Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());
    format!("{stem}-{offset}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CorpusConfig;
    use std::fs::File;
    use std::io::Write;

    fn record(name: &str, identifier: &str, file: &str, offset: u32) -> IndexRecord {
        IndexRecord {
            name_lower: name.to_lowercase(),
            identifier: identifier.to_string(),
            region: String::new(),
            status: String::new(),
            source_file: file.to_string(),
            row_offset: offset,
            display_name: name.to_string(),
        }
    }

    #[test]
    fn short_query_matches_nothing() {
        let index = CorpusIndex {
            records: vec![record("Acme Corp", "CIN1", "a.csv", 0)],
        };
        assert!(index.find_matches("a").is_empty());
        assert!(index.find_matches(" ").is_empty());
    }

    #[test]
    fn matches_on_name_and_identifier() {
        let index = CorpusIndex {
            records: vec![
                record("Acme Corp", "CIN100", "a.csv", 0),
                record("Beta LLC", "ACME-2", "a.csv", 1),
                record("Gamma Ltd", "CIN300", "a.csv", 2),
            ],
        };
        let hits = index.find_matches("ACME");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].display_name, "Acme Corp");
        assert_eq!(hits[1].display_name, "Beta LLC");
    }

    #[test]
    fn cap_takes_first_fifty_in_index_order() {
        let records: Vec<_> = (0..60)
            .map(|i| record(&format!("Acme {i}"), "", "a.csv", i))
            .collect();
        let index = CorpusIndex { records };

        let hits = index.find_matches("acme");
        assert_eq!(hits.len(), 50);
        assert_eq!(hits[0].row_offset, 0);
        assert_eq!(hits[49].row_offset, 49);
    }

    #[test]
    fn resolves_full_rows_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = File::create(dir.path().join("companies.csv")).unwrap();
        writeln!(f, "Name,CIN,State,Status").unwrap();
        writeln!(f, "Acme Corp,CIN123,MH,Active").unwrap();
        writeln!(f, "Other Co,CIN999,KA,Active").unwrap();
        writeln!(f, "Acme Two,CIN456,DL,Inactive").unwrap();

        let config = CorpusConfig::new(dir.path());
        let index = CorpusIndex::build(&config);
        let results = search(&index, dir.path(), "acme").unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Acme Corp");
        assert_eq!(results[0].id, "companies-0");
        assert_eq!(results[0].region, "MH");
        assert_eq!(results[1].name, "Acme Two");
        assert_eq!(results[1].status, "Inactive");
        // Every original column rides along.
        assert!(results[0]
            .columns
            .iter()
            .any(|(k, v)| k == "CIN" && v == "CIN123"));
    }

    #[test]
    fn unresolvable_file_yields_partial_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = File::create(dir.path().join("present.csv")).unwrap();
        writeln!(f, "Name").unwrap();
        writeln!(f, "Acme Corp").unwrap();

        let index = CorpusIndex {
            records: vec![
                record("Acme Gone", "", "missing.csv", 0),
                record("Acme Corp", "", "present.csv", 0),
            ],
        };
        let results = search(&index, dir.path(), "acme").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Acme Corp");
    }
}
