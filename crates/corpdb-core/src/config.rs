// crates/corpdb-core/src/config.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Daily query allowance for unauthenticated callers.
pub const DAILY_QUERY_CAP: u32 = 10;

/// Rolling rate-limit window, measured from an identity's first query.
pub const RATE_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Hard cap on matches collected per query. Not a ranked top-N: scanning
/// stops at the cap, so results are biased toward earlier-indexed rows.
pub const MATCH_CAP: usize = 50;

/// Queries shorter than this short-circuit to an empty result.
pub const MIN_QUERY_LEN: usize = 2;

/// Identity used when an unauthenticated caller supplies no address claim.
pub const FALLBACK_IDENTITY: &str = "127.0.0.1";

/// File extensions accepted when scanning the corpus directory.
pub const CORPUS_EXTENSIONS: [&str; 4] = ["csv", "xlsx", "xls", "json"];

#[cfg(feature = "compact")]
pub const SNAPSHOT_FILENAME: &str = "corpdb.idx.bin.gz";
#[cfg(not(feature = "compact"))]
pub const SNAPSHOT_FILENAME: &str = "corpdb.idx.bin";

/// Locations the engine reads from and writes to.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// Directory scanned (non-recursively) for corpus files.
    pub data_dir: PathBuf,
    /// Where the serialized index snapshot lives.
    pub snapshot_path: PathBuf,
}

impl CorpusConfig {
    /// Config for a corpus directory, with the snapshot colocated in it.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let snapshot_path = data_dir.join(SNAPSHOT_FILENAME);
        Self {
            data_dir,
            snapshot_path,
        }
    }

    /// Same corpus directory, snapshot relocated elsewhere.
    pub fn with_snapshot(mut self, snapshot_path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = snapshot_path.into();
        self
    }

    pub fn default_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    pub fn default_snapshot_filename() -> &'static str {
        SNAPSHOT_FILENAME
    }

    /// True if `path` names the snapshot file. The snapshot may be
    /// colocated with the corpus and must never be scanned as data.
    pub fn is_snapshot(&self, path: &Path) -> bool {
        path.file_name() == self.snapshot_path.file_name()
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self::new(Self::default_data_dir())
    }
}
