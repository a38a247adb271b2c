// crates/corpdb-core/src/index.rs

//! # Index Builder
//!
//! Handles the one-time corpus scan that produces the in-memory index,
//! plus the physical layer for its binary snapshot (I/O, compression).

use crate::config::{CorpusConfig, CORPUS_EXTENSIONS};
use crate::error::{CorpError, Result};
use crate::extract::{FieldBindings, UNKNOWN_NAME};
use crate::model::{CorpusStats, IndexRecord};
use crate::source;
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Snapshot deserialization guard against data bombs.
const SNAPSHOT_SIZE_LIMIT: u64 = 256 * 1024 * 1024;

/// The in-memory index: one lightweight record per indexed source row.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CorpusIndex {
    pub records: Vec<IndexRecord>,
}

impl CorpusIndex {
    /// Scans every corpus file once and builds the index.
    ///
    /// The scan is non-recursive and limited to the accepted extensions;
    /// the snapshot file is excluded even when colocated. A file that
    /// fails to open or parse is logged and skipped; a missing directory
    /// yields an empty index, never an error.
    pub fn build(config: &CorpusConfig) -> Self {
        let entries = match fs::read_dir(&config.data_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %config.data_dir.display(), error = %e, "corpus directory unreadable");
                return Self::default();
            }
        };

        let mut files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && has_corpus_extension(p) && !config.is_snapshot(p))
            .collect();
        // Deterministic scan order; match-cap bias depends on it.
        files.sort();

        let mut records = Vec::new();
        for path in &files {
            if let Err(e) = scan_file(path, &mut records) {
                tracing::warn!(file = %path.display(), error = %e, "skipping corpus file");
            }
        }

        tracing::info!(files = files.len(), records = records.len(), "index built");
        Self { records }
    }

    pub fn stats(&self) -> CorpusStats {
        let files: HashSet<&str> = self.records.iter().map(|r| r.source_file.as_str()).collect();
        CorpusStats {
            files: files.len(),
            records: self.records.len(),
        }
    }

    /// Writes the snapshot (gzipped bincode under the `compact` feature).
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let writer = BufWriter::new(file);

        #[cfg(feature = "compact")]
        let mut encoder: Box<dyn Write> = Box::new(flate2::write::GzEncoder::new(
            writer,
            flate2::Compression::default(),
        ));
        #[cfg(not(feature = "compact"))]
        let mut encoder: Box<dyn Write> = Box::new(writer);

        snapshot_options().serialize_into(&mut encoder, self)?;
        encoder.flush()?;
        Ok(())
    }

    /// Reloads a snapshot, bypassing the corpus scan.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut stream = open_stream(path.as_ref())?;
        let mut data = Vec::new();
        stream.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let index = snapshot_options().deserialize(data)?;
        Ok(index)
    }
}

/// Shared bincode configuration; write and read sides must agree, and the
/// size limit guards deserialization against data bombs.
fn snapshot_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(SNAPSHOT_SIZE_LIMIT)
        .allow_trailing_bytes()
}

/// Scans one file, appending a record per row whose extracted name is not
/// "Unknown". `row_offset` advances for every data row, indexed or not,
/// so later positional re-reads stay aligned.
fn scan_file(path: &Path, records: &mut Vec<IndexRecord>) -> Result<()> {
    let source_file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let set = source::open(path)?;
    let bindings = FieldBindings::resolve(&set.headers);

    let mut offset: u32 = 0;
    for row in set.rows {
        let fields = bindings.extract(&row);
        if fields.name != UNKNOWN_NAME {
            records.push(IndexRecord {
                name_lower: fields.name.to_lowercase(),
                identifier: fields.identifier,
                region: fields.region,
                status: fields.status,
                source_file: source_file.clone(),
                row_offset: offset,
                display_name: fields.name,
            });
        }
        offset += 1;
    }
    Ok(())
}

fn has_corpus_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let ext = e.to_ascii_lowercase();
            CORPUS_EXTENSIONS.iter().any(|accepted| *accepted == ext)
        })
        .unwrap_or(false)
}

/// Opens the snapshot, buffered and gzip-decoded when `compact` is on.
fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        CorpError::NotFound(format!("Snapshot not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    #[cfg(feature = "compact")]
    {
        Ok(Box::new(flate2::read::GzDecoder::new(reader)))
    }

    #[cfg(not(feature = "compact"))]
    {
        Ok(Box::new(reader))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_corpus(dir: &Path, name: &str, content: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn missing_directory_builds_empty_index() {
        let config = CorpusConfig::new("/nonexistent/corpdb-test");
        let index = CorpusIndex::build(&config);
        assert!(index.records.is_empty());
    }

    #[test]
    fn offsets_advance_for_unindexed_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(
            dir.path(),
            "companies.csv",
            "Name,CIN\nAcme Corp,CIN1\n,CIN2\nBeta LLC,CIN3\n",
        );

        let index = CorpusIndex::build(&CorpusConfig::new(dir.path()));
        // Nameless middle row is excluded but still occupies offset 1.
        assert_eq!(index.records.len(), 2);
        assert_eq!(index.records[0].row_offset, 0);
        assert_eq!(index.records[1].row_offset, 2);
        assert_eq!(index.records[1].display_name, "Beta LLC");
        assert_eq!(index.records[1].name_lower, "beta llc");
    }

    #[test]
    fn unparseable_file_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path(), "good.csv", "Name\nAcme Corp\n");
        write_corpus(dir.path(), "bad.json", "{ not json");
        write_corpus(dir.path(), "ignored.txt", "Name\nNot Scanned\n");

        let index = CorpusIndex::build(&CorpusConfig::new(dir.path()));
        assert_eq!(index.records.len(), 1);
        assert_eq!(index.records[0].source_file, "good.csv");
    }

    #[test]
    fn snapshot_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(dir.path(), "companies.csv", "Name,CIN\nAcme Corp,CIN1\n");

        let config = CorpusConfig::new(dir.path());
        let built = CorpusIndex::build(&config);
        built.save_as(&config.snapshot_path).unwrap();

        let loaded = CorpusIndex::load_from_path(&config.snapshot_path).unwrap();
        assert_eq!(loaded.records.len(), built.records.len());
        assert_eq!(loaded.records[0].name_lower, "acme corp");

        // The colocated snapshot must not be scanned as corpus data.
        let rebuilt = CorpusIndex::build(&config);
        assert_eq!(rebuilt.records.len(), built.records.len());
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.bin");
        fs::write(&path, b"not a snapshot").unwrap();
        assert!(CorpusIndex::load_from_path(&path).is_err());
    }
}
