// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Statistics repository over the SPARQL executor

use super::queries;
use super::StatisticsRepository;
use crate::error::{RepositoryError, RepositoryResult};
use crate::graph::{
    join_as_from_named_graphs, GraphQueryExecutor, NamedGraphs, ParameterizedQuery,
    QueryResultSet,
};
use crate::model::{
    PropertyCharacteristic, PropertyMetadata, PropertyUsage, StatisticItem, StatisticsResult,
};
use crate::validation::is_valid_base_uri;
use crate::vocab::Vocabulary;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use url::Url;

const INVALID_FORMAT: &str = "The request does not match the required format.";

pub struct SparqlStatisticsRepository {
    executor: Arc<dyn GraphQueryExecutor>,
    graphs: NamedGraphs,
    vocabulary: Vocabulary,
    language: String,
}

#[derive(Default)]
struct CharacteristicCounts {
    label: Option<String>,
    draft: u64,
    published: u64,
    other: u64,
}

impl SparqlStatisticsRepository {
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

    fn ensure_valid(uri: &Url) -> RepositoryResult<()> {
        if is_valid_base_uri(uri) {
            Ok(())
        } else {
            Err(RepositoryError::InvalidFormat(format!(
                "{} ({})",
                INVALID_FORMAT, uri
            )))
        }
    }

    /// Query with the bindings every resource query shares
    fn resource_query(&self, template: &str) -> ParameterizedQuery {
        let mut query = ParameterizedQuery::new(template);
        query
            .set_plain_literal("fromResources", self.graphs.resources_from())
            .set_plain_literal("fromMetadata", self.graphs.metadata_from())
            .set_plain_literal(
                "fromShacl",
                join_as_from_named_graphs(&self.graphs.shacl_constraints),
            )
            .set_plain_literal(
                "fromConsumerGroups",
                join_as_from_named_graphs(&self.graphs.consumer_groups),
            )
            .set_plain_literal(
                "fromEnterpriseCore",
                join_as_from_named_graphs(&self.graphs.enterprise_core),
            )
            .set_uri("hasPidEntryDraft", &self.vocabulary.has_pid_entry_draft)
            .set_uri("hasPidUri", &self.vocabulary.pid_uri)
            .set_literal("language", &self.language);
        query
    }

    async fn run(&self, query: &ParameterizedQuery) -> RepositoryResult<QueryResultSet> {
        Ok(self.executor.execute(query).await?)
    }

    async fn characteristics(
        &self,
        resource_types: &[String],
        dimension: &str,
    ) -> RepositoryResult<Vec<PropertyCharacteristic>> {
        if resource_types.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = self.resource_query(queries::CHARACTERISTICS);
        query
            .set_plain_literal("from", self.graphs.resources_with_labels_from())
            .set_plain_literal("dimension", dimension)
            .set_uri("hasLifecycleStatus", &self.vocabulary.has_lifecycle_status)
            .set_uri_list("resourceTypes", resource_types);

        let result = self.run(&query).await?;

        let mut by_key: BTreeMap<String, CharacteristicCounts> = BTreeMap::new();
        for row in &result.rows {
            let Some(key) = row.get_string("key") else {
                continue;
            };
            let counts = by_key.entry(key).or_default();
            if counts.label.is_none() {
                counts.label = row.get_string("label");
            }
            let count = row.get_count("count");
            match row.get("status") {
                Some(status) if status == self.vocabulary.lifecycle_draft => counts.draft += count,
                Some(status) if status == self.vocabulary.lifecycle_published => {
                    counts.published += count
                }
                _ => counts.other += count,
            }
        }

        Ok(by_key
            .into_iter()
            .map(|(key, c)| PropertyCharacteristic {
                key,
                name: c.label,
                count: c.draft + c.published + c.other,
                draft_count: c.draft,
                published_count: c.published,
            })
            .collect())
    }
}

#[async_trait]
impl StatisticsRepository for SparqlStatisticsRepository {
    async fn total_number_of_resources(&self, resource_types: &[String]) -> RepositoryResult<u64> {
        if resource_types.is_empty() {
            return Ok(0);
        }

        let mut query = self.resource_query(queries::TOTAL_NUMBER_OF_RESOURCES);
        query.set_uri_list("resourceTypes", resource_types);

        let result = self.run(&query).await?;
        Ok(result
            .first()
            .map(|row| row.get_count("resourceSum"))
            .unwrap_or(0))
    }

    async fn total_number_of_resources_by_predicate(
        &self,
        predicate: &Url,
    ) -> RepositoryResult<Option<u64>> {
        Self::ensure_valid(predicate)?;

        let mut query = self.resource_query(queries::TOTAL_NUMBER_OF_RESOURCES_BY_PREDICATE);
        query.set_uri("predicate", predicate.as_str());

        let result = self.run(&query).await?;
        Ok(result.first().map(|row| row.get_count("valueSum")))
    }

    async fn number_of_controlled_vocabulary_selection(
        &self,
        predicate: &Url,
        resource_types: &[String],
    ) -> RepositoryResult<StatisticsResult> {
        Self::ensure_valid(predicate)?;
        if resource_types.is_empty() {
            return Ok(StatisticsResult::empty());
        }

        let mut query = self.resource_query(queries::CONTROLLED_VOCABULARY_SELECTION);
        query
            .set_uri("predicate", predicate.as_str())
            .set_uri_list("resourceTypes", resource_types);

        let result = self.run(&query).await?;
        let Some(name) = result.first().and_then(|row| row.get_string("predicateName")) else {
            return Ok(StatisticsResult::empty());
        };

        let total = self.total_number_of_resources_by_predicate(predicate).await?;

        let items = result
            .rows
            .iter()
            .filter(|row| row.get("predicateName") == Some(name.as_str()))
            .map(|row| {
                let mut item =
                    StatisticItem::new(row.get("label").unwrap_or_default(), row.get_count("valueSum"))
                        .with_total(total);
                item.property = row.get_string("predicate");
                item
            })
            .collect();

        Ok(StatisticsResult::new(name, 0, items))
    }

    async fn property_values_of_all_resources(
        &self,
        predicate: &Url,
        resource_types: &[String],
    ) -> RepositoryResult<(Option<String>, Vec<String>)> {
        Self::ensure_valid(predicate)?;
        if resource_types.is_empty() {
            return Ok((None, Vec::new()));
        }

        let mut query = self.resource_query(queries::PROPERTY_VALUES_OF_ALL_RESOURCES);
        query
            .set_uri("predicate", predicate.as_str())
            .set_uri_list("resourceTypes", resource_types);

        let result = self.run(&query).await?;
        let label = result
            .rows
            .iter()
            .rev()
            .find_map(|row| row.get_string("predicateName"));
        let values = result
            .rows
            .iter()
            .map(|row| row.get_string("string").unwrap_or_default())
            .collect();

        Ok((label, values))
    }

    async fn number_of_versions_of_resources(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<u64>> {
        if resource_types.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = self.resource_query(queries::NUMBER_OF_VERSIONS_OF_RESOURCES);
        query
            .set_uri("hasLaterVersion", &self.vocabulary.has_later_version)
            .set_uri_list("resourceTypes", resource_types);

        let result = self.run(&query).await?;
        Ok(result
            .rows
            .iter()
            .map(|row| row.get_count("laterVersions"))
            .collect())
    }

    async fn number_of_property_usage_by_group(
        &self,
        group: &Url,
    ) -> RepositoryResult<Vec<StatisticItem>> {
        Self::ensure_valid(group)?;

        let mut query = self.resource_query(queries::PROPERTY_USAGE_BY_GROUP);
        query
            .set_uri("group", group.as_str())
            .set_uri("firstResourceType", &self.vocabulary.first_resource_type);

        let result = self.run(&query).await?;
        Ok(result
            .rows
            .iter()
            .map(|row| {
                StatisticItem::new(
                    row.get("links").unwrap_or_default(),
                    row.get_count("resources"),
                )
            })
            .collect())
    }

    async fn resource_type_characteristics(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyCharacteristic>> {
        self.characteristics(resource_types, queries::DIMENSION_RESOURCE_TYPE)
            .await
    }

    async fn consumer_group_characteristics(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyCharacteristic>> {
        let dimension = queries::dimension_by_predicate(&self.vocabulary.has_consumer_group);
        self.characteristics(resource_types, &dimension).await
    }

    async fn information_classification_characteristics(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyCharacteristic>> {
        let dimension =
            queries::dimension_by_predicate(&self.vocabulary.has_information_classification);
        self.characteristics(resource_types, &dimension).await
    }

    async fn lifecycle_status_characteristics(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyCharacteristic>> {
        self.characteristics(resource_types, queries::DIMENSION_LIFECYCLE_STATUS)
            .await
    }

    async fn all_properties_by_resource_types(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyMetadata>> {
        if resource_types.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = self.resource_query(queries::ALL_PROPERTIES_BY_RESOURCE_TYPES);
        query
            .set_plain_literal("fromShacl", self.graphs.shacl_from())
            .set_uri_list("resourceTypes", resource_types);

        let result = self.run(&query).await?;

        let mut seen = HashSet::new();
        let mut properties = Vec::new();
        for row in &result.rows {
            let (Some(resource_type), Some(property_uri)) =
                (row.get_string("type"), row.get_string("predicate"))
            else {
                continue;
            };
            if !seen.insert((resource_type.clone(), property_uri.clone())) {
                continue;
            }
            properties.push(PropertyMetadata {
                group: row.get_string("group"),
                resource_type,
                shacl_constraint: row.get_string("shacl"),
                property_uri,
                property_name: row.get_string("predicateName"),
                is_mandatory: row.get_count("minCount") > 0,
            });
        }

        Ok(properties)
    }

    async fn usage_of_properties(
        &self,
        properties: &[String],
    ) -> RepositoryResult<Vec<PropertyUsage>> {
        if properties.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = self.resource_query(queries::USAGE_OF_PROPERTIES);
        query.set_uri_list("properties", properties);

        let result = self.run(&query).await?;
        let usage: HashMap<String, u64> = result
            .rows
            .iter()
            .filter_map(|row| {
                row.get_string("predicate")
                    .map(|p| (p, row.get_count("usage")))
            })
            .collect();

        Ok(properties
            .iter()
            .map(|property| PropertyUsage {
                property_uri: property.clone(),
                usage_count: usage.get(property).copied().unwrap_or(0),
            })
            .collect())
    }
}
