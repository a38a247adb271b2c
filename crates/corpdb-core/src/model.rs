// crates/corpdb-core/src/model.rs

use serde::{Deserialize, Serialize};

/// An ordered row of (column label, raw value) pairs as read from a source
/// file. Column sets are file-defined; order follows the source header.
pub type Row = Vec<(String, String)>;

/// The resident projection of one source row.
///
/// One `IndexRecord` is kept in memory per indexed row for the lifetime of
/// the process; full rows are re-read from disk on demand via the locator
/// (`source_file`, `row_offset`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Canonical name, lowercased, used for matching.
    pub name_lower: String,
    /// Canonical identifier (may be empty), matched case-insensitively.
    pub identifier: String,
    pub region: String,
    pub status: String,
    /// File the row came from (file name, relative to the corpus dir).
    pub source_file: String,
    /// 0-based position among the file's data rows, header excluded.
    /// Purely positional: stable across rebuilds only while the source
    /// file's row order is unchanged.
    pub row_offset: u32,
    /// Original-case name, kept for presentation without a disk read.
    pub display_name: String,
}

/// A fully reconstructed result record: canonical fields plus every
/// original column of the source row.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultRow {
    /// Deterministic id derived from the locator: `{file-stem}-{offset}`.
    pub id: String,
    pub name: String,
    pub region: String,
    pub identifier: String,
    pub status: String,
    /// Every column of the source row, in source order.
    pub columns: Row,
}

/// Aggregate counts over the in-memory index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CorpusStats {
    pub files: usize,
    pub records: usize,
}

/// Outcome of one call to the search entry point.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<ResultRow>,
    /// Human-readable reason when the query was denied (rate limit).
    pub error: Option<String>,
    /// Queries left in the caller's window; `None` means unlimited
    /// (privileged callers, or queries that consumed no quota).
    pub remaining: Option<u32>,
    pub privileged: bool,
}

impl SearchResponse {
    pub(crate) fn empty(privileged: bool) -> Self {
        Self {
            results: Vec::new(),
            error: None,
            remaining: None,
            privileged,
        }
    }

    pub(crate) fn denied(reason: String) -> Self {
        Self {
            results: Vec::new(),
            error: Some(reason),
            remaining: Some(0),
            privileged: false,
        }
    }
}
