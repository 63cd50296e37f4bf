// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Service configuration
//!
//! Loaded from a JSON file where every field is optional, then overridden by
//! `REPORTING_*` environment variables.

use crate::cache::CacheConfig;
use crate::error::ConfigError;
use crate::graph::NamedGraphs;
use crate::scheduler::SchedulerConfig;
use crate::vocab::Vocabulary;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const ENV_SPARQL_ENDPOINT: &str = "REPORTING_SPARQL_ENDPOINT";
pub const ENV_REGISTRATION_URL: &str = "REPORTING_REGISTRATION_URL";
pub const ENV_SERVICE_URL: &str = "REPORTING_SERVICE_URL";
pub const ENV_BIND_ADDRESS: &str = "REPORTING_BIND_ADDRESS";
pub const ENV_ACCESS_TOKEN: &str = "REPORTING_ACCESS_TOKEN";

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Namespace base of the resource vocabulary
    pub service_url: String,
    pub sparql_endpoint: String,
    pub request_timeout_secs: u64,
    pub registration_service_url: String,
    pub access_token: Option<String>,
    pub bind_address: String,
    pub language: String,
    pub named_graphs: NamedGraphs,
    pub cache: CacheConfig,
    pub scheduler: SchedulerConfig,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            service_url: "https://pid.bayer.com/".to_string(),
            sparql_endpoint: "http://localhost:3030/colid/query".to_string(),
            request_timeout_secs: 300,
            registration_service_url: "http://localhost:51770/api/v3".to_string(),
            access_token: None,
            bind_address: "0.0.0.0:8080".to_string(),
            language: "en".to_string(),
            named_graphs: NamedGraphs::default(),
            cache: CacheConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl std::fmt::Debug for ReportingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportingConfig")
            .field("service_url", &self.service_url)
            .field("sparql_endpoint", &self.sparql_endpoint)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("registration_service_url", &self.registration_service_url)
            .field("has_access_token", &self.access_token.is_some())
            .field("bind_address", &self.bind_address)
            .field("language", &self.language)
            .field("named_graphs", &self.named_graphs)
            .field("cache", &self.cache)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

impl ReportingConfig {
    /// Load from a JSON file and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 4] = [
            (ENV_SPARQL_ENDPOINT, &mut self.sparql_endpoint),
            (ENV_REGISTRATION_URL, &mut self.registration_service_url),
            (ENV_SERVICE_URL, &mut self.service_url),
            (ENV_BIND_ADDRESS, &mut self.bind_address),
        ];
        for (name, field) in overrides {
            if let Some(value) = env_value(name) {
                log::debug!("Configuration override from {}", name);
                *field = value;
            }
        }
        if let Some(token) = env_value(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("service_url", &self.service_url),
            ("sparql_endpoint", &self.sparql_endpoint),
            ("registration_service_url", &self.registration_service_url),
        ] {
            let url = Url::parse(value)
                .map_err(|e| ConfigError::Invalid(format!("{} '{}': {}", name, value, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, value
                )));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be > 0".to_string(),
            ));
        }
        if self.language.trim().is_empty() {
            return Err(ConfigError::Invalid("language must not be empty".to_string()));
        }
        if self.named_graphs.is_empty() {
            return Err(ConfigError::Invalid(
                "named_graphs.resources must list at least one graph".to_string(),
            ));
        }

        self.cache.validate().map_err(ConfigError::Invalid)?;
        self.scheduler.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Vocabulary derived from `service_url`
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::new(&self.service_url)
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for name in [
            ENV_SPARQL_ENDPOINT,
            ENV_REGISTRATION_URL,
            ENV_SERVICE_URL,
            ENV_BIND_ADDRESS,
            ENV_ACCESS_TOKEN,
        ] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ReportingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.language, "en");
        assert_eq!(config.cache.default_ttl_secs, 14_400);
        assert_eq!(config.scheduler.inter_task_delay_secs, 120);
    }

    #[test]
    fn test_from_file_keeps_defaults_for_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "service_url": "https://pid.example.org/",
                "scheduler": {{ "cooldown_secs": 60 }},
                "cache": {{ "max_entries": 16 }}
            }}"#
        )
        .unwrap();

        let config = ReportingConfig::from_file(file.path()).unwrap();
        assert_eq!(config.service_url, "https://pid.example.org/");
        assert_eq!(config.scheduler.cooldown_secs, 60);
        assert_eq!(config.scheduler.inter_task_delay_secs, 120);
        assert_eq!(config.cache.max_entries, 16);
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(
            config.vocabulary().first_resource_type,
            "https://pid.example.org/kos/19050/PID_Concept"
        );
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            ReportingConfig::from_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ReportingConfig::from_file(Path::new("/nonexistent/reporting.json")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var(ENV_SPARQL_ENDPOINT, "http://graph.local:3030/ds/query");
        std::env::set_var(ENV_ACCESS_TOKEN, "token-123");
        std::env::set_var(ENV_BIND_ADDRESS, "  ");

        let config = ReportingConfig::load(None).unwrap();
        assert_eq!(config.sparql_endpoint, "http://graph.local:3030/ds/query");
        assert_eq!(config.access_token.as_deref(), Some("token-123"));
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert!(!format!("{:?}", config).contains("token-123"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_override_fails_validation() {
        clear_env();
        std::env::set_var(ENV_SERVICE_URL, "not a url");
        assert!(matches!(
            ReportingConfig::load(None),
            Err(ConfigError::Invalid(_))
        ));
        clear_env();
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ReportingConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
