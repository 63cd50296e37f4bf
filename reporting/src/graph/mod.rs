// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph store access
//!
//! - [`ParameterizedQuery`] - SPARQL templates with typed `@name` bindings
//! - [`GraphQueryExecutor`] - the executor contract consumed by repositories
//! - [`SparqlHttpExecutor`] - SPARQL protocol client over HTTP
//! - [`NamedGraphs`] - graph names used in FROM clauses

pub mod http_executor;
pub mod named_graphs;
pub mod parameterized;

pub use http_executor::SparqlHttpExecutor;
pub use named_graphs::{join_as_from_named_graphs, NamedGraphs};
pub use parameterized::{join_as_values_list, Binding, ParameterizedQuery};

use crate::error::QueryError;
use async_trait::async_trait;
use std::collections::HashMap;

/// One solution of a SELECT query, keyed by variable name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRow {
    pub values: HashMap<String, String>,
}

impl ResultRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by tests and in-memory executors
    pub fn with(mut self, variable: &str, value: impl Into<String>) -> Self {
        self.values.insert(variable.to_string(), value.into());
        self
    }

    pub fn get(&self, variable: &str) -> Option<&str> {
        self.values.get(variable).map(String::as_str)
    }

    pub fn get_string(&self, variable: &str) -> Option<String> {
        self.get(variable).map(str::to_string)
    }

    /// Read a count, treating missing or unparsable values as 0
    pub fn get_count(&self, variable: &str) -> u64 {
        self.get(variable)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0)
    }

    pub fn get_bool(&self, variable: &str) -> bool {
        matches!(self.get(variable), Some("true") | Some("1"))
    }
}

/// Tabular result of a SELECT query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResultSet {
    pub variables: Vec<String>,
    pub rows: Vec<ResultRow>,
}

impl QueryResultSet {
    pub fn new(variables: Vec<String>, rows: Vec<ResultRow>) -> Self {
        Self { variables, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn first(&self) -> Option<&ResultRow> {
        self.rows.first()
    }
}

/// Executes parameterized queries against the knowledge graph
#[async_trait]
pub trait GraphQueryExecutor: Send + Sync {
    async fn execute(&self, query: &ParameterizedQuery) -> Result<QueryResultSet, QueryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_are_lenient() {
        let row = ResultRow::new()
            .with("count", "42")
            .with("bad", "forty-two")
            .with("padded", " 7 ");
        assert_eq!(row.get_count("count"), 42);
        assert_eq!(row.get_count("bad"), 0);
        assert_eq!(row.get_count("missing"), 0);
        assert_eq!(row.get_count("padded"), 7);
    }

    #[test]
    fn test_bool_values() {
        let row = ResultRow::new().with("a", "true").with("b", "false");
        assert!(row.get_bool("a"));
        assert!(!row.get_bool("b"));
        assert!(!row.get_bool("c"));
    }
}
