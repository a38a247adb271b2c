// crates/corpdb-core/src/error.rs

use thiserror::Error;

/// Error taxonomy for the corpus engine.
///
/// Most conditions are recovered locally (a bad file is skipped, a corrupt
/// snapshot triggers a rescan); only [`CorpError::Search`] is ever surfaced
/// to a caller of the search entry point as a hard failure.
#[derive(Debug, Error)]
pub enum CorpError {
    /// Dataset, directory or snapshot not found.
    #[error("{0}")]
    NotFound(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot serialization / deserialization failure.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    /// Malformed JSON corpus file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Spreadsheet container could not be read.
    #[error("sheet error: {0}")]
    Sheet(#[from] calamine::Error),

    /// Malformed row or file encountered during a scan.
    #[error("parse error in {file}: {reason}")]
    Parse { file: String, reason: String },

    /// Unexpected failure in the match/resolve pipeline. The one error
    /// that propagates to the search caller.
    #[error("search failed: {0}")]
    Search(String),
}

pub type Result<T, E = CorpError> = std::result::Result<T, E>;
