// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph Reporting - cached resource statistics over a SPARQL knowledge graph
//!
//! The crate computes aggregate statistics about catalog resources stored in a
//! triple store and serves them from a time-expiring cache.
//!
//! # Architecture
//!
//! ```text
//! RefreshScheduler ──► StatisticsService::refresh ──► StatisticsRepository ──► GraphQueryExecutor
//!                                │                                                   (SPARQL)
//!                                ▼
//!                           StatisticsCache ◄── StatisticsService::get_* ◄── HTTP handlers
//! ```
//!
//! - [`scheduler`] - background loop that refreshes every statistic in a fixed order
//! - [`service`] - write path (`cache_*`) and cache-only read path (`get_*`)
//! - [`repository`] - SPARQL query construction and row mapping
//! - [`cache`] - key/value store with per-entry TTL
//! - [`graph`] - parameterized queries and the query executor contract
//! - [`metadata`] - resource type lookups and hierarchy traversal
//! - [`contact`] / [`remote`] - contact reports enriched from the registration service

pub mod cache;
pub mod config;
pub mod contact;
pub mod error;
pub mod graph;
pub mod metadata;
pub mod model;
pub mod remote;
pub mod repository;
pub mod scheduler;
pub mod service;
pub mod validation;
pub mod vocab;

pub use cache::{CacheStore, MemoryCacheStore, StatisticsCache};
pub use config::ReportingConfig;
pub use contact::ContactService;
pub use error::{ReportingError, ReportingResult, ValidationError};
pub use model::{PropertyCharacteristic, StatisticItem, StatisticsResult};
pub use scheduler::{default_plan, RefreshScheduler, RefreshTask, Refresher, SchedulerState};
pub use service::{Characteristic, StatisticsService};
pub use vocab::Vocabulary;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
