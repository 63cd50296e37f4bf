// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Resource type metadata
//!
//! The resource types form a tree below the first resource type. Repositories
//! filter by the instantiable types of that tree; the number-of-properties
//! report aggregates per-type counts up the tree.

pub mod hierarchy;
pub mod sparql;

pub use hierarchy::{
    aggregate_counts, build_hierarchy, collect_descendant_ids, find_node, leaf_ids, TypeNode,
};
pub use sparql::SparqlMetadataService;

use crate::error::MetadataError;
use async_trait::async_trait;

/// Lookups over the resource type hierarchy
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Non-abstract types at or below `root`
    async fn instantiable_types(&self, root: &str) -> Result<Vec<String>, MetadataError>;

    /// Types at or below `root` without subtypes
    async fn leaf_types(&self, root: &str) -> Result<Vec<String>, MetadataError>;

    /// The hierarchy rooted at `root`
    async fn type_hierarchy(&self, root: &str) -> Result<TypeNode, MetadataError>;
}
