//! enrich::cache
//!
//! Explicit per-client metadata cache.
//!
//! Keyed by [`ProjectRef`] (platform plus project id or URL). Entries
//! live for the process lifetime and are dropped only by an explicit
//! [`clear`]. The cache is owned by the client that created it; two
//! clients share a cache only when one is explicitly injected into both.
//!
//! Only successful fetches are cached; fallback records are recomputed so
//! a transient outage does not pin empty data for the process lifetime.
//!
//! [`clear`]: MetadataCache::clear

use std::collections::HashMap;
use std::sync::Mutex;

use crate::core::types::{ModMetadata, ProjectRef};

/// Unbounded process-lifetime metadata cache.
///
/// The lock is held only for map operations, never across I/O.
#[derive(Debug, Default)]
pub struct MetadataCache {
    inner: Mutex<HashMap<ProjectRef, ModMetadata>>,
}

/// Diagnostic view of the cache contents.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    /// Number of cached records.
    pub size: usize,
    /// All cache keys, sorted for stable output.
    pub keys: Vec<String>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached metadata for a reference, if present.
    pub fn get(&self, reference: &ProjectRef) -> Option<ModMetadata> {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .get(reference)
            .cloned()
    }

    /// Insert (or replace) the record for a reference.
    pub fn insert(&self, reference: ProjectRef, metadata: ModMetadata) {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .insert(reference, metadata);
    }

    /// Drop every cached record.
    pub fn clear(&self) {
        self.inner.lock().expect("cache lock poisoned").clear();
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size and key list for diagnostics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().expect("cache lock poisoned");
        let mut keys: Vec<String> = inner.keys().map(ProjectRef::to_string).collect();
        keys.sort();
        CacheStats {
            size: inner.len(),
            keys,
        }
    }
}
