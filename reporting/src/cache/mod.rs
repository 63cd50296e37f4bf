// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Statistics cache
//!
//! Every statistic is stored as a JSON value under a well-known key with a
//! fixed TTL. The refresh scheduler writes, request handlers read.
//!
//! Reports computed on demand for a client-supplied parameter live in a
//! separate bounded store, so they can never evict a scheduled statistic
//! before its TTL runs out.
//!
//! - [`CacheStore`] - key/value contract (get, set with TTL, delete, exists)
//! - [`MemoryCacheStore`] - in-memory implementation with lazy expiry
//! - [`StatisticsCache`] - typed facade that (de)serializes payloads

pub mod cache_config;
pub mod clock;
pub mod keys;
pub mod memory_store;

pub use cache_config::CacheConfig;
pub use clock::{Clock, ManualClock, SystemClock};
pub use memory_store::{CacheStats, MemoryCacheStore};

use crate::error::CacheError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cache entry metadata
#[derive(Debug, Clone)]
pub struct CacheEntryMetadata {
    pub created_at: Instant,
    pub written_at: DateTime<Utc>,
    pub access_count: u32,
    pub ttl: Option<Duration>,
}

impl CacheEntryMetadata {
    pub fn new(now: Instant) -> Self {
        Self {
            created_at: now,
            written_at: Utc::now(),
            access_count: 0,
            ttl: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.saturating_duration_since(self.created_at) >= ttl,
            None => false,
        }
    }

    pub fn update_access(&mut self) {
        self.access_count += 1;
    }
}

/// Key/value store shared by the scheduler and request handlers
///
/// Every operation is atomic per key, so a reader observes either the old or
/// the new value of an entry.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value, ttl: Duration);
    fn delete(&self, key: &str) -> bool;
    fn exists(&self, key: &str) -> bool;
}

/// Store used when caching is disabled: nothing is ever retained
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCacheStore;

impl CacheStore for NoopCacheStore {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    fn set(&self, _key: &str, _value: Value, _ttl: Duration) {}

    fn delete(&self, _key: &str) -> bool {
        false
    }

    fn exists(&self, _key: &str) -> bool {
        false
    }
}

/// Typed access to the cache stores
///
/// `store` holds the scheduled statistics, `on_demand` the reports computed
/// for a client-supplied parameter.
#[derive(Clone)]
pub struct StatisticsCache {
    store: Arc<dyn CacheStore>,
    on_demand: Arc<dyn CacheStore>,
    default_ttl: Duration,
}

impl StatisticsCache {
    pub fn new(store: Arc<dyn CacheStore>, default_ttl: Duration) -> Self {
        Self {
            store,
            on_demand: Arc::new(MemoryCacheStore::default()),
            default_ttl,
        }
    }

    pub fn with_on_demand_store(mut self, on_demand: Arc<dyn CacheStore>) -> Self {
        self.on_demand = on_demand;
        self
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        if !config.enabled {
            log::warn!("Statistics cache is disabled, reports will stay empty");
            return Self::new(Arc::new(NoopCacheStore), config.default_ttl())
                .with_on_demand_store(Arc::new(NoopCacheStore));
        }
        Self::new(Arc::new(MemoryCacheStore::unbounded()), config.default_ttl())
            .with_on_demand_store(Arc::new(MemoryCacheStore::new(config.max_entries)))
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn on_demand_store(&self) -> &Arc<dyn CacheStore> {
        &self.on_demand
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn exists(&self, key: &str) -> bool {
        self.store.exists(key)
    }

    /// Remove a key from both stores
    pub fn delete(&self, key: &str) -> bool {
        let scheduled = self.store.delete(key);
        let on_demand = self.on_demand.delete(key);
        scheduled || on_demand
    }

    /// Read and decode an entry
    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        decode(key, self.store.get(key))
    }

    /// Read an entry, treating an undecodable payload as missing
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        logged_lookup(key, self.try_get(key))
    }

    /// Read an on-demand report, preferring a scheduled entry under the same key
    pub fn get_on_demand<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if let Some(value) = self.get(key) {
            return Some(value);
        }
        logged_lookup(key, decode(key, self.on_demand.get(key)))
    }

    /// Store a value with the default TTL
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        self.set_with_ttl(key, value, self.default_ttl)
    }

    pub fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.store.set(key, encode(key, value)?, ttl);
        Ok(())
    }

    /// Store an on-demand report with the default TTL
    pub fn set_on_demand<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        self.on_demand.set(key, encode(key, value)?, self.default_ttl);
        Ok(())
    }
}

fn encode<T: Serialize>(key: &str, value: &T) -> Result<Value, CacheError> {
    serde_json::to_value(value).map_err(|e| CacheError::Serialization {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(key: &str, value: Option<Value>) -> Result<Option<T>, CacheError> {
    match value {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| CacheError::Deserialization {
                key: key.to_string(),
                message: e.to_string(),
            }),
        None => Ok(None),
    }
}

fn logged_lookup<T>(key: &str, lookup: Result<Option<T>, CacheError>) -> Option<T> {
    match lookup {
        Ok(value) => {
            log::debug!(
                "Cache {} for '{}'",
                if value.is_some() { "hit" } else { "miss" },
                key
            );
            value
        }
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    }
}

impl std::fmt::Debug for StatisticsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticsCache")
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}
