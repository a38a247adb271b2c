// crates/corpdb-core/src/service.rs

//! # Search entry point
//!
//! Ties the pieces together: rate-limit gate, index readiness, match and
//! resolve. Session issuance and transport live outside this crate; the
//! service consumes only an identity string and a privileged flag.

use crate::cache::IndexCache;
use crate::config::{CorpusConfig, DAILY_QUERY_CAP, FALLBACK_IDENTITY, MIN_QUERY_LEN, RATE_WINDOW};
use crate::error::{CorpError, Result};
use crate::limit::RateLimiter;
use crate::model::SearchResponse;
use crate::search;

/// One search service per process. Owns the build coordinator and the
/// rate-limit table; both are shared across all concurrent callers.
pub struct SearchService {
    config: CorpusConfig,
    limiter: RateLimiter,
    cache: IndexCache,
}

impl SearchService {
    pub fn new(config: CorpusConfig) -> Self {
        Self {
            config,
            limiter: RateLimiter::new(RATE_WINDOW, DAILY_QUERY_CAP),
            cache: IndexCache::new(),
        }
    }

    /// Answers one query for the given caller.
    ///
    /// Queries shorter than two characters return empty with no side
    /// effects: no quota consumed, no index access. Privileged callers
    /// bypass the rate limit entirely (`remaining` stays `None`). The
    /// caller identity is a caller-supplied address claim with a loopback
    /// fallback; it is spoofable, which is a known limitation of the
    /// design, so the limit is best-effort only.
    ///
    /// Rate-limit denial is a soft outcome carried in the response; only
    /// an unexpected pipeline failure comes back as `Err`.
    pub fn search(
        &self,
        query: &str,
        caller_identity: &str,
        is_privileged: bool,
    ) -> Result<SearchResponse> {
        let query = query.trim();
        if query.len() < MIN_QUERY_LEN {
            return Ok(SearchResponse::empty(is_privileged));
        }

        let mut remaining = None;
        if !is_privileged {
            let identity = if caller_identity.trim().is_empty() {
                FALLBACK_IDENTITY
            } else {
                caller_identity.trim()
            };
            let decision = self.limiter.check(identity);
            if !decision.allowed {
                tracing::debug!(identity, "query denied by rate limit");
                return Ok(SearchResponse::denied(format!(
                    "daily query limit of {DAILY_QUERY_CAP} reached; try again later"
                )));
            }
            remaining = Some(decision.remaining);
        }

        let index = self.cache.ensure_ready(&self.config);
        let results = search::search(&index, &self.config.data_dir, query)
            .map_err(|e| CorpError::Search(e.to_string()))?;

        Ok(SearchResponse {
            results,
            error: None,
            remaining,
            privileged: is_privileged,
        })
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// Forces the index to readiness ahead of the first query.
    pub fn warm_up(&self) {
        self.cache.ensure_ready(&self.config);
    }
}
