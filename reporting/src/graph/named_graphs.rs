// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Named graphs queried by the repositories

use super::parameterized::render_uri;
use serde::{Deserialize, Serialize};

/// Graph names grouped by what they contain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedGraphs {
    /// Published and draft resource graphs
    pub resources: Vec<String>,
    /// Metadata graphs holding the resource type hierarchy
    pub metadata: Vec<String>,
    /// Graphs holding SHACL property shapes
    pub shacl_constraints: Vec<String>,
    pub consumer_groups: Vec<String>,
    /// Enterprise core ontology (persons, controlled vocabularies)
    pub enterprise_core: Vec<String>,
}

impl Default for NamedGraphs {
    fn default() -> Self {
        Self {
            resources: vec![
                "https://pid.bayer.com/resource/4.0".to_string(),
                "https://pid.bayer.com/resource/4.0/Draft".to_string(),
            ],
            metadata: vec!["https://pid.bayer.com/kos/19050/5.0".to_string()],
            shacl_constraints: vec!["https://pid.bayer.com/resource/shacl/5.0".to_string()],
            consumer_groups: vec!["https://pid.bayer.com/consumergroup/1.0".to_string()],
            enterprise_core: vec!["https://pid.bayer.com/eco/1.0".to_string()],
        }
    }
}

impl NamedGraphs {
    pub fn resources_from(&self) -> String {
        join_as_from_named_graphs(&self.resources)
    }

    pub fn metadata_from(&self) -> String {
        join_as_from_named_graphs(&self.metadata)
    }

    /// FROM clauses for SHACL shapes plus the metadata graphs they refer to
    pub fn shacl_from(&self) -> String {
        join_as_from_named_graphs(
            &self
                .shacl_constraints
                .iter()
                .chain(self.metadata.iter())
                .cloned()
                .collect::<Vec<_>>(),
        )
    }

    /// FROM clauses for resources joined with their type and vocabulary labels
    pub fn resources_with_labels_from(&self) -> String {
        join_as_from_named_graphs(
            &self
                .resources
                .iter()
                .chain(self.metadata.iter())
                .chain(self.consumer_groups.iter())
                .chain(self.enterprise_core.iter())
                .cloned()
                .collect::<Vec<_>>(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Render a graph list as `FROM <g>` lines
pub fn join_as_from_named_graphs<S: AsRef<str>>(graphs: &[S]) -> String {
    graphs
        .iter()
        .map(|g| format!("FROM {}", render_uri(g.as_ref())))
        .collect::<Vec<_>>()
        .join("\n")
}
