// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory cache store with per-entry TTL
//!
//! Expired entries are dropped lazily when they are looked up, or in bulk by
//! [`MemoryCacheStore::purge_expired`]. When the entry bound is reached the
//! oldest entry is evicted.

use super::clock::{Clock, SystemClock};
use super::{CacheEntryMetadata, CacheStore};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    metadata: CacheEntryMetadata,
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub total_requests: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_requests as f64
        }
    }
}

pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    stats: RwLock<CacheStats>,
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

impl MemoryCacheStore {
    pub fn new(max_entries: usize) -> Self {
        Self::with_clock(max_entries, Arc::new(SystemClock))
    }

    /// Store that never evicts; entries leave only by TTL or delete
    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }

    pub fn with_clock(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: RwLock::new(CacheStats::default()),
            max_entries,
            clock,
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Time of the last write of a live entry
    pub fn written_at(&self, key: &str) -> Option<DateTime<Utc>> {
        let now = self.clock.now();
        self.entries
            .read()
            .get(key)
            .filter(|entry| !entry.metadata.is_expired(now))
            .map(|entry| entry.metadata.written_at)
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.metadata.is_expired(now));
        let removed = before - entries.len();
        if removed > 0 {
            self.stats.write().expirations += removed as u64;
            log::debug!("Purged {} expired cache entries", removed);
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    fn evict_oldest(&self, entries: &mut HashMap<String, CacheEntry>) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.metadata.created_at)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            entries.remove(&key);
            self.stats.write().evictions += 1;
            log::debug!("Evicted cache entry '{}'", key);
        }
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let mut stats = self.stats.write();
        stats.total_requests += 1;

        let expired = match entries.get(key) {
            Some(entry) => entry.metadata.is_expired(now),
            None => {
                stats.misses += 1;
                return None;
            }
        };

        if expired {
            entries.remove(key);
            stats.misses += 1;
            stats.expirations += 1;
            return None;
        }

        let entry = entries.get_mut(key)?;
        entry.metadata.update_access();
        stats.hits += 1;
        Some(entry.value.clone())
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) {
        let now = self.clock.now();
        let mut entries = self.entries.write();

        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            let before = entries.len();
            entries.retain(|_, entry| !entry.metadata.is_expired(now));
            let expired = before - entries.len();
            if expired > 0 {
                self.stats.write().expirations += expired as u64;
            }
            if entries.len() >= self.max_entries {
                self.evict_oldest(&mut entries);
            }
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                metadata: CacheEntryMetadata::new(now).with_ttl(ttl),
            },
        );
        self.stats.write().insertions += 1;
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    fn exists(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let expired = match entries.get(key) {
            Some(entry) => entry.metadata.is_expired(now),
            None => return false,
        };
        if expired {
            entries.remove(key);
            self.stats.write().expirations += 1;
        }
        !expired
    }
}
