// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! SPARQL protocol executor over HTTP
//!
//! Queries are sent as `application/x-www-form-urlencoded` POST requests and
//! the response is read as `application/sparql-results+json`.

use super::{GraphQueryExecutor, ParameterizedQuery, QueryResultSet, ResultRow};
use crate::error::QueryError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

pub struct SparqlHttpExecutor {
    client: Client,
    endpoint: String,
    auth_token: Option<String>,
}

impl SparqlHttpExecutor {
    pub fn new(endpoint: impl Into<String>, request_timeout: Duration) -> Result<Self, QueryError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| QueryError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            auth_token: None,
        })
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for SparqlHttpExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparqlHttpExecutor")
            .field("endpoint", &self.endpoint)
            .field("has_auth_token", &self.auth_token.is_some())
            .finish()
    }
}

#[async_trait]
impl GraphQueryExecutor for SparqlHttpExecutor {
    async fn execute(&self, query: &ParameterizedQuery) -> Result<QueryResultSet, QueryError> {
        let rendered = query.render();
        log::debug!("Executing SPARQL query against {}:\n{}", self.endpoint, rendered);

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", rendered.as_str())]);

        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                QueryError::Connection(format!("Query timed out: {}", e))
            } else if e.is_connect() {
                QueryError::Connection(format!("Failed to connect to graph store: {}", e))
            } else {
                QueryError::Execution(format!("Query request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(QueryError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| QueryError::Decode(e.to_string()))?;
        parse_sparql_json(&body)
    }
}

#[derive(Debug, Deserialize)]
struct SparqlJson {
    head: SparqlHead,
    #[serde(default)]
    results: Option<SparqlResults>,
    #[serde(default)]
    boolean: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SparqlHead {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<HashMap<String, SparqlTerm>>,
}

#[derive(Debug, Deserialize)]
struct SparqlTerm {
    value: String,
}

/// Parse a `application/sparql-results+json` document
///
/// ASK responses become a single row with the variable `boolean`.
pub fn parse_sparql_json(body: &str) -> Result<QueryResultSet, QueryError> {
    let parsed: SparqlJson =
        serde_json::from_str(body).map_err(|e| QueryError::Decode(e.to_string()))?;

    if let Some(answer) = parsed.boolean {
        return Ok(QueryResultSet::new(
            vec!["boolean".to_string()],
            vec![ResultRow::new().with("boolean", answer.to_string())],
        ));
    }

    let rows = parsed
        .results
        .map(|results| {
            results
                .bindings
                .into_iter()
                .map(|binding| ResultRow {
                    values: binding.into_iter().map(|(k, term)| (k, term.value)).collect(),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(QueryResultSet::new(parsed.head.vars, rows))
}
