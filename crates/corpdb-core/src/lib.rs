// crates/corpdb-core/src/lib.rs

//! # corpdb-core
//!
//! Substring search over a corpus of tabular company records stored in
//! heterogeneous flat files (delimited text, spreadsheets, JSON arrays).
//!
//! The engine is two-phase: a compact in-memory index is built once from
//! the full corpus (and cached as a binary snapshot), then matching rows
//! are re-read lazily from their source files to assemble full results.

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod index;
pub mod limit;
pub mod model;
pub mod search;
pub mod service;
pub mod source;

// Re-exports
pub use crate::cache::IndexCache;
pub use crate::config::CorpusConfig;
pub use crate::error::{CorpError, Result};
pub use crate::index::CorpusIndex;
pub use crate::limit::{Decision, RateLimiter};
pub use crate::model::{CorpusStats, IndexRecord, ResultRow, SearchResponse};
pub use crate::service::SearchService;
