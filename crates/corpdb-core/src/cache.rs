// crates/corpdb-core/src/cache.rs

//! # Index Cache / Build Coordinator
//!
//! Process-wide holder of the built index. The expensive corpus scan runs
//! at most once; concurrent callers that arrive while a build is in
//! flight wait for it and converge on the same result.

use crate::config::CorpusConfig;
use crate::index::CorpusIndex;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

enum CacheState {
    /// Never built.
    Empty,
    /// A build is in flight; waiters block on the condvar.
    Building,
    /// Built for the process lifetime. The transition here is one-way;
    /// there is no invalidation path.
    Ready(Arc<CorpusIndex>),
}

/// Single-flight coordinator around the index build.
///
/// This is the only place the build state is touched; the state machine
/// lives behind one mutex, never behind bare flags.
pub struct IndexCache {
    state: Mutex<CacheState>,
    ready: Condvar,
}

impl IndexCache {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(CacheState::Empty),
            ready: Condvar::new(),
        }
    }

    /// Returns the index, building it if this is the first call.
    ///
    /// `Empty`: tries the snapshot first, falls back to a full corpus
    /// scan, and goes `Ready` even when both yield nothing; a broken
    /// corpus must not leave every query retrying the build.
    /// `Building`: blocks until the in-flight build publishes.
    /// `Ready`: returns immediately, no reload check.
    pub fn ensure_ready(&self, config: &CorpusConfig) -> Arc<CorpusIndex> {
        let mut guard = lock(&self.state);
        loop {
            match &*guard {
                CacheState::Ready(index) => return Arc::clone(index),
                CacheState::Building => {
                    guard = self
                        .ready
                        .wait(guard)
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                }
                CacheState::Empty => {
                    *guard = CacheState::Building;
                    break;
                }
            }
        }
        drop(guard);

        // Disk work happens outside the lock.
        let index = Arc::new(load_or_build(config));

        let mut guard = lock(&self.state);
        *guard = CacheState::Ready(Arc::clone(&index));
        self.ready.notify_all();
        index
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*lock(&self.state), CacheState::Ready(_))
    }
}

impl Default for IndexCache {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Snapshot if present and sound, full scan otherwise. A fresh build is
/// snapshotted best-effort; failure to persist never fails the build.
fn load_or_build(config: &CorpusConfig) -> CorpusIndex {
    if config.snapshot_path.exists() {
        match CorpusIndex::load_from_path(&config.snapshot_path) {
            Ok(index) => {
                tracing::info!(records = index.records.len(), "index loaded from snapshot");
                return index;
            }
            Err(e) => {
                tracing::warn!(error = %e, "snapshot unreadable, rescanning corpus");
            }
        }
    }

    let index = CorpusIndex::build(config);
    if let Err(e) = index.save_as(&config.snapshot_path) {
        tracing::warn!(error = %e, "could not persist index snapshot");
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use std::thread;

    fn seed_corpus(dir: &std::path::Path) {
        let mut f = File::create(dir.join("companies.csv")).unwrap();
        writeln!(f, "Name,CIN").unwrap();
        writeln!(f, "Acme Corp,CIN123").unwrap();
    }

    #[test]
    fn second_call_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        seed_corpus(dir.path());
        let config = CorpusConfig::new(dir.path());

        let cache = IndexCache::new();
        let first = cache.ensure_ready(&config);
        assert_eq!(first.records.len(), 1);

        // Remove the corpus entirely; a Ready cache must not go back to disk.
        fs::remove_file(dir.path().join("companies.csv")).unwrap();
        fs::remove_file(&config.snapshot_path).unwrap();
        let second = cache.ensure_ready(&config);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn prefers_snapshot_over_rescan() {
        let dir = tempfile::tempdir().unwrap();
        seed_corpus(dir.path());
        let config = CorpusConfig::new(dir.path());

        let built = crate::index::CorpusIndex::build(&config);
        built.save_as(&config.snapshot_path).unwrap();
        // Corpus gone, snapshot remains: the cache must still come up Ready.
        fs::remove_file(dir.path().join("companies.csv")).unwrap();

        let cache = IndexCache::new();
        let index = cache.ensure_ready(&config);
        assert_eq!(index.records.len(), 1);
    }

    #[test]
    fn corrupt_snapshot_falls_back_to_rescan() {
        let dir = tempfile::tempdir().unwrap();
        seed_corpus(dir.path());
        let config = CorpusConfig::new(dir.path());
        fs::write(&config.snapshot_path, b"garbage").unwrap();

        let cache = IndexCache::new();
        let index = cache.ensure_ready(&config);
        assert_eq!(index.records.len(), 1);
    }

    #[test]
    fn missing_corpus_still_reaches_ready() {
        let config = CorpusConfig::new("/nonexistent/corpdb-cache-test");
        let cache = IndexCache::new();
        let index = cache.ensure_ready(&config);
        assert!(index.records.is_empty());
        assert!(cache.is_ready());
    }

    #[test]
    fn concurrent_callers_converge_on_one_build() {
        let dir = tempfile::tempdir().unwrap();
        seed_corpus(dir.path());
        let config = CorpusConfig::new(dir.path());
        let cache = Arc::new(IndexCache::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let config = config.clone();
                thread::spawn(move || cache.ensure_ready(&config))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        // All callers observe the identical Arc, i.e. a single build ran.
        for index in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], index));
        }
        assert_eq!(results[0].records.len(), 1);
    }
}
