//! Caller-owned cache of enrichment results keyed by input content.
//!
//! The key is the SHA-256 of the raw CSV bytes, so re-reading an unchanged
//! file is free while any edit produces a fresh entry. Nothing is global:
//! whoever owns the cache decides when to invalidate it.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::enrichment;
use crate::error::DashboardResult;
use crate::models::EnrichedTable;

/// Hex-encoded SHA-256 of a CSV payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey(String);

impl ContentKey {
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        ContentKey(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough for logs and the status bar
        write!(f, "{}", &self.0[..12])
    }
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug)]
pub struct EnrichmentCache {
    capacity: usize,
    entries: HashMap<ContentKey, Arc<EnrichedTable>>,
    insertion_order: VecDeque<ContentKey>,
    hits: u64,
    misses: u64,
}

impl EnrichmentCache {
    /// Create a cache holding at most `capacity` tables (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Enrich `bytes`, reusing a previous result for identical content
    pub fn get_or_enrich(&mut self, bytes: &[u8]) -> DashboardResult<(ContentKey, Arc<EnrichedTable>)> {
        self.get_or_insert_with(bytes, enrichment::enrich)
    }

    /// Like [`get_or_enrich`](Self::get_or_enrich) with a custom transform.
    /// Failed transforms are not cached.
    pub fn get_or_insert_with<F>(
        &mut self,
        bytes: &[u8],
        transform: F,
    ) -> DashboardResult<(ContentKey, Arc<EnrichedTable>)>
    where
        F: FnOnce(&[u8]) -> DashboardResult<EnrichedTable>,
    {
        let key = ContentKey::of(bytes);
        if let Some(table) = self.entries.get(&key) {
            self.hits += 1;
            debug!("Enrichment cache hit for {}", key);
            return Ok((key, Arc::clone(table)));
        }

        self.misses += 1;
        debug!("Enrichment cache miss for {}", key);
        let table = Arc::new(transform(bytes)?);

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.insertion_order.pop_front() {
                debug!("Evicting cached table {}", oldest);
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key.clone(), Arc::clone(&table));
        self.insertion_order.push_back(key.clone());
        Ok((key, table))
    }

    pub fn get(&self, key: &ContentKey) -> Option<Arc<EnrichedTable>> {
        self.entries.get(key).cloned()
    }

    /// Drop one entry; returns whether it was present
    pub fn invalidate(&mut self, key: &ContentKey) -> bool {
        self.insertion_order.retain(|k| k != key);
        self.entries.remove(key).is_some()
    }

    /// Drop every entry; counters are kept
    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

impl Default for EnrichmentCache {
    fn default() -> Self {
        Self::new(crate::models::DEFAULT_CACHE_CAPACITY)
    }
}
