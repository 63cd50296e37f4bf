// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Metadata service backed by the metadata graphs

use super::hierarchy::{build_hierarchy, leaf_ids, TypeNode};
use super::MetadataService;
use crate::error::MetadataError;
use crate::graph::{GraphQueryExecutor, NamedGraphs, ParameterizedQuery};
use crate::vocab::Vocabulary;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

const TYPE_HIERARCHY_QUERY: &str = r#"SELECT DISTINCT ?type ?parent ?label ?abstract
@fromMetadata
WHERE {
    ?type rdfs:subClassOf* @root .
    OPTIONAL { ?type rdfs:subClassOf ?parent . }
    OPTIONAL {
        ?type rdfs:label ?label .
        FILTER(lang(?label) IN (@language, ""))
    }
    OPTIONAL { ?type @isAbstract ?abstract . }
}"#;

struct TypeRows {
    edges: Vec<(String, String)>,
    labels: HashMap<String, String>,
    abstract_types: BTreeSet<String>,
    types: BTreeSet<String>,
}

pub struct SparqlMetadataService {
    executor: Arc<dyn GraphQueryExecutor>,
    graphs: NamedGraphs,
    vocabulary: Vocabulary,
    language: String,
}

impl SparqlMetadataService {
    pub fn new(
        executor: Arc<dyn GraphQueryExecutor>,
        graphs: NamedGraphs,
        vocabulary: Vocabulary,
        language: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            graphs,
            vocabulary,
            language: language.into(),
        }
    }

    async fn load_types(&self, root: &str) -> Result<TypeRows, MetadataError> {
        let mut query = ParameterizedQuery::new(TYPE_HIERARCHY_QUERY);
        query
            .set_plain_literal("fromMetadata", self.graphs.metadata_from())
            .set_uri("root", root)
            .set_uri("isAbstract", &self.vocabulary.is_abstract)
            .set_literal("language", &self.language);

        let result = self.executor.execute(&query).await?;
        if result.is_empty() {
            return Err(MetadataError::TypeNotFound(root.to_string()));
        }

        let mut rows = TypeRows {
            edges: Vec::new(),
            labels: HashMap::new(),
            abstract_types: BTreeSet::new(),
            types: BTreeSet::new(),
        };

        for row in &result.rows {
            let Some(ty) = row.get_string("type") else {
                continue;
            };
            if let Some(parent) = row.get_string("parent") {
                rows.edges.push((ty.clone(), parent));
            }
            if let Some(label) = row.get_string("label") {
                rows.labels.entry(ty.clone()).or_insert(label);
            }
            if row.get_bool("abstract") {
                rows.abstract_types.insert(ty.clone());
            }
            rows.types.insert(ty);
        }

        Ok(rows)
    }
}

#[async_trait]
impl MetadataService for SparqlMetadataService {
    async fn instantiable_types(&self, root: &str) -> Result<Vec<String>, MetadataError> {
        let rows = self.load_types(root).await?;
        let tree = build_hierarchy(root, &rows.edges, &rows.labels);
        let mut types: Vec<String> = tree
            .ids()
            .into_iter()
            .filter(|id| !rows.abstract_types.contains(id))
            .collect();
        types.sort();
        types.dedup();
        Ok(types)
    }

    async fn leaf_types(&self, root: &str) -> Result<Vec<String>, MetadataError> {
        let rows = self.load_types(root).await?;
        let tree = build_hierarchy(root, &rows.edges, &rows.labels);
        let mut leaves = leaf_ids(&tree);
        leaves.sort();
        leaves.dedup();
        Ok(leaves)
    }

    async fn type_hierarchy(&self, root: &str) -> Result<TypeNode, MetadataError> {
        let rows = self.load_types(root).await?;
        log::debug!("Loaded {} types below {}", rows.types.len(), root);
        Ok(build_hierarchy(root, &rows.edges, &rows.labels))
    }
}
