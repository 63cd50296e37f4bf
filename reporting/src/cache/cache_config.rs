// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cache configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Statistics cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable/disable caching entirely
    pub enabled: bool,

    /// Lifetime of every statistic, measured from its last write
    pub default_ttl_secs: u64,

    /// Maximum number of on-demand report entries held in memory
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl_secs: 4 * 60 * 60,
            max_entries: 1024,
        }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        if self.default_ttl_secs == 0 {
            return Err("Cache default_ttl_secs must be > 0".to_string());
        }

        if self.max_entries == 0 {
            return Err("Cache max_entries must be > 0".to_string());
        }

        Ok(())
    }
}
