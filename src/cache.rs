//! Result cache.
//!
//! A TTL-bounded in-memory map from case-folded normalized URL to the full
//! [`AnalysisReport`]. Expiry is lazy: stale entries are dropped on lookup.
//! Double-computation under a racing miss is harmless, so the lock is held
//! only for map access, never across an analysis.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use log::debug;

use crate::report::AnalysisReport;

struct CacheEntry {
    stored_at: Instant,
    report: AnalysisReport,
}

pub struct ResultCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        ResultCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached report for a normalized URL, dropping it first if
    /// its TTL has lapsed.
    pub fn get(&self, url: &str) -> Option<AnalysisReport> {
        let key = url.to_lowercase();
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                debug!("cache hit for {}", key);
                Some(entry.report.clone())
            }
            Some(_) => {
                debug!("cache entry expired for {}", key);
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, url: &str, report: AnalysisReport) {
        let key = url.to_lowercase();
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                report,
            },
        );
    }
}
