// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Client for the remote registration service

use crate::error::RemoteServiceError;
use crate::model::ConsumerGroup;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Supplies bearer tokens for outgoing calls
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<Option<String>, RemoteServiceError>;
}

/// A fixed token from configuration, or none
#[derive(Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<Option<String>, RemoteServiceError> {
        Ok(self.token.clone())
    }
}

/// Registration service operations used by the contact report
#[async_trait]
pub trait RegistrationService: Send + Sync {
    async fn active_consumer_groups(&self) -> Result<Vec<ConsumerGroup>, RemoteServiceError>;
}

pub struct HttpRegistrationService {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl HttpRegistrationService {
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, RemoteServiceError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| RemoteServiceError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn active_consumer_groups_url(&self) -> String {
        format!("{}/consumerGroupList/active", self.base_url)
    }
}

impl fmt::Debug for HttpRegistrationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRegistrationService")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl RegistrationService for HttpRegistrationService {
    async fn active_consumer_groups(&self) -> Result<Vec<ConsumerGroup>, RemoteServiceError> {
        let url = self.active_consumer_groups_url();
        log::debug!("Fetching active consumer groups from {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = self.tokens.access_token().await? {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteServiceError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteServiceError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RemoteServiceError::Decode(e.to_string()))?;
        decode_consumer_groups(&body)
    }
}

/// Decode the `consumerGroupList/active` response body
pub fn decode_consumer_groups(body: &str) -> Result<Vec<ConsumerGroup>, RemoteServiceError> {
    serde_json::from_str(body).map_err(|e| RemoteServiceError::Decode(e.to_string()))
}
