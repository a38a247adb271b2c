// crates/corpdb-core/src/extract.rs

//! # Field Extractor
//!
//! Maps heterogeneous source columns onto the four canonical fields
//! (name, identifier, region, status). Header labels are matched against
//! field-specific patterns once per file, fixing column indices for every
//! row of that file.

use crate::model::Row;
use once_cell::sync::Lazy;
use regex::Regex;

/// Name assigned when a row carries no usable name column. Rows named
/// `UNKNOWN_NAME` are excluded from the index.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Candidate header patterns per canonical field, in precedence order.
/// Specific registry labels win over generic ones.
static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r"^company[\s_]*name$", r"^name$"]));
static IDENTIFIER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r"^cin$"]));
static REGION_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r"^company[\s_]*state[\s_]*code$", r"^state$"]));
static STATUS_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r"^company[\s_]*status$", r"^status$"]));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("static pattern"))
        .collect()
}

/// Canonical fields pulled out of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub name: String,
    pub identifier: String,
    pub region: String,
    pub status: String,
}

/// Column indices for the canonical fields, resolved once per file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldBindings {
    name: Option<usize>,
    identifier: Option<usize>,
    region: Option<usize>,
    status: Option<usize>,
}

impl FieldBindings {
    /// Binds canonical fields to column positions in `headers`. For each
    /// field, the first pattern that matches any header wins.
    pub fn resolve(headers: &[String]) -> Self {
        Self {
            name: bind(headers, &NAME_PATTERNS),
            identifier: bind(headers, &IDENTIFIER_PATTERNS),
            region: bind(headers, &REGION_PATTERNS),
            status: bind(headers, &STATUS_PATTERNS),
        }
    }

    /// Extracts canonical fields from a header-aligned row. A missing or
    /// empty name yields [`UNKNOWN_NAME`]; the other fields default to the
    /// empty string.
    pub fn extract(&self, row: &Row) -> Extracted {
        let name = self.field(row, self.name);
        Extracted {
            name: if name.is_empty() {
                UNKNOWN_NAME.to_string()
            } else {
                name
            },
            identifier: self.field(row, self.identifier),
            region: self.field(row, self.region),
            status: self.field(row, self.status),
        }
    }

    fn field(&self, row: &Row, idx: Option<usize>) -> String {
        idx.and_then(|i| row.get(i))
            .map(|(_, value)| value.trim().to_string())
            .unwrap_or_default()
    }
}

fn bind(headers: &[String], patterns: &[Regex]) -> Option<usize> {
    for pattern in patterns {
        if let Some(pos) = headers.iter().position(|h| pattern.is_match(h.trim())) {
            return Some(pos);
        }
    }
    None
}
