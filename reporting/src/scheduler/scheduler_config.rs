// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Refresh scheduler configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub enabled: bool,
    /// Wait before the first cycle
    pub initial_delay_secs: u64,
    /// Pause between two tasks of a cycle
    pub inter_task_delay_secs: u64,
    /// Pause after the last task of a cycle
    pub cooldown_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay_secs: 0,
            inter_task_delay_secs: 120,
            cooldown_secs: 14_400,
        }
    }
}

impl SchedulerConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    pub fn inter_task_delay(&self) -> Duration {
        Duration::from_secs(self.inter_task_delay_secs)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.cooldown_secs == 0 {
            return Err("Scheduler cooldown_secs must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.inter_task_delay(), Duration::from_millis(120_000));
        assert_eq!(config.cooldown(), Duration::from_millis(14_400_000));
        assert!(config.initial_delay().is_zero());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SchedulerConfig =
            serde_json::from_str(r#"{ "inter_task_delay_secs": 5 }"#).unwrap();
        assert_eq!(config.inter_task_delay_secs, 5);
        assert_eq!(config.cooldown_secs, 14_400);
        assert!(config.enabled);
    }

    #[test]
    fn test_zero_cooldown_rejected_when_enabled() {
        let mut config = SchedulerConfig {
            cooldown_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        config.enabled = false;
        assert!(config.validate().is_ok());
    }
}
