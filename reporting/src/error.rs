// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for the reporting service
//!
//! Each layer has its own error enum. They all convert into [`ReportingError`],
//! which keeps "bad input" (rejected before any I/O) apart from upstream
//! failures. A statistic that is simply not cached yet is not an error.

use thiserror::Error;

/// Input validation errors raised by the read path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid URI for parameter '{parameter}': {value}")]
    InvalidUri { parameter: String, value: String },

    #[error("Parameter '{parameter}' must be greater than zero, got {value}")]
    NonPositive { parameter: String, value: i64 },

    #[error("Parameter '{0}' must not be empty")]
    Blank(String),
}

/// Errors raised while executing a graph query
#[derive(Error, Debug, Clone)]
pub enum QueryError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Graph store returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode query result: {0}")]
    Decode(String),

    #[error("Query execution error: {0}")]
    Execution(String),
}

/// Errors raised by the statistics and contact repositories
#[derive(Error, Debug, Clone)]
pub enum RepositoryError {
    #[error("The request does not match the required format: {0}")]
    InvalidFormat(String),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Unexpected result: {0}")]
    Mapping(String),
}

/// Errors raised by the metadata service
#[derive(Error, Debug, Clone)]
pub enum MetadataError {
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Type not found in hierarchy: {0}")]
    TypeNotFound(String),
}

/// Errors raised by the cache layer
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    #[error("Failed to serialize cache value for '{key}': {message}")]
    Serialization { key: String, message: String },

    #[error("Failed to deserialize cache value for '{key}': {message}")]
    Deserialization { key: String, message: String },
}

/// Errors raised when calling the remote registration service
#[derive(Error, Debug, Clone)]
pub enum RemoteServiceError {
    #[error("Failed to acquire access token: {0}")]
    Token(String),

    #[error("Request to registration service failed: {0}")]
    Request(String),

    #[error("Something went wrong while fetching consumer groups in registration service (status {0})")]
    Status(u16),

    #[error("Failed to decode registration service response: {0}")]
    Decode(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level error for the reporting service
#[derive(Error, Debug, Clone)]
pub enum ReportingError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Remote service error: {0}")]
    Remote(#[from] RemoteServiceError),

    #[error("Task panicked: {0}")]
    Panic(String),
}

impl From<QueryError> for ReportingError {
    fn from(error: QueryError) -> Self {
        ReportingError::Repository(RepositoryError::Query(error))
    }
}

impl ReportingError {
    /// True for errors caused by the caller's input
    pub fn is_validation(&self) -> bool {
        matches!(self, ReportingError::Validation(_))
    }
}

pub type ReportingResult<T> = Result<T, ReportingError>;
pub type RepositoryResult<T> = Result<T, RepositoryError>;
