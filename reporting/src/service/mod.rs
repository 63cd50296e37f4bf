// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Statistics service
//!
//! The write path (`cache_*`) recomputes one statistic through the repository
//! and stores it under its cache key. It logs and swallows failures; the
//! scheduler uses [`Refresher::refresh`] instead, which returns them.
//!
//! The read path (`get_*`) validates its parameters, then serves from the
//! cache only. A missing entry yields the empty result. Controlled vocabulary
//! selection and property usage by group are populated lazily on a miss.

pub mod bucketing;
pub mod properties;

pub use bucketing::{bucketize, word_count};
pub use properties::{build_property_statistics, NUMBER_OF_PROPERTIES_NAME};

use crate::cache::{keys, StatisticsCache};
use crate::error::{ReportingResult, ValidationError};
use crate::metadata::{MetadataService, TypeNode};
use crate::model::{
    PropertyCharacteristic, PropertyMetadata, PropertyUsage, StatisticsResult,
    VersionCountSnapshot, WordCountSnapshot,
};
use crate::repository::StatisticsRepository;
use crate::scheduler::{RefreshTask, Refresher};
use crate::validation::{require_positive, require_uri};
use crate::vocab::Vocabulary;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

pub const VERSIONS_OF_RESOURCES_NAME: &str = "Amount of resource versions";

/// Categorical dimension of a characteristics report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Characteristic {
    #[serde(rename = "type")]
    ResourceType,
    ConsumerGroup,
    InformationClassification,
    LifecycleStatus,
}

impl Characteristic {
    pub const ALL: [Characteristic; 4] = [
        Characteristic::ResourceType,
        Characteristic::ConsumerGroup,
        Characteristic::InformationClassification,
        Characteristic::LifecycleStatus,
    ];

    pub fn cache_key(&self) -> &'static str {
        match self {
            Characteristic::ResourceType => keys::TOTAL_RESOURCE_TYPE_CHARACTERISTICS,
            Characteristic::ConsumerGroup => keys::TOTAL_CONSUMER_GROUP_CHARACTERISTICS,
            Characteristic::InformationClassification => {
                keys::TOTAL_INFORMATION_CLASSIFICATION_CHARACTERISTICS
            }
            Characteristic::LifecycleStatus => keys::TOTAL_LIFECYCLE_STATUS_CHARACTERISTICS,
        }
    }

    /// Path segment of the characteristics endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Characteristic::ResourceType => "type",
            Characteristic::ConsumerGroup => "consumergroup",
            Characteristic::InformationClassification => "informationclassification",
            Characteristic::LifecycleStatus => "lifecyclestatus",
        }
    }

    fn operation(&self) -> &'static str {
        match self {
            Characteristic::ResourceType => "CacheResourceTypeCharacteristics",
            Characteristic::ConsumerGroup => "CacheConsumerGroupCharacteristics",
            Characteristic::InformationClassification => {
                "CacheInformationClassificationCharacteristics"
            }
            Characteristic::LifecycleStatus => "CacheLifecycleStatusCharacteristics",
        }
    }
}

impl FromStr for Characteristic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Characteristic::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown characteristic: {}", s))
    }
}

pub struct StatisticsService {
    repository: Arc<dyn StatisticsRepository>,
    metadata: Arc<dyn MetadataService>,
    cache: StatisticsCache,
    vocabulary: Vocabulary,
}

impl StatisticsService {
    pub fn new(
        repository: Arc<dyn StatisticsRepository>,
        metadata: Arc<dyn MetadataService>,
        cache: StatisticsCache,
        vocabulary: Vocabulary,
    ) -> Self {
        Self {
            repository,
            metadata,
            cache,
            vocabulary,
        }
    }

    pub fn cache(&self) -> &StatisticsCache {
        &self.cache
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Instantiable types below the first resource type
    async fn resource_types(&self) -> ReportingResult<Vec<String>> {
        Ok(self
            .metadata
            .instantiable_types(&self.vocabulary.first_resource_type)
            .await?)
    }

    // ---- write path, errors propagated ----

    pub async fn refresh_total_number_of_resources(&self) -> ReportingResult<()> {
        self.cache.delete(keys::TOTAL_NUMBER_OF_RESOURCES);
        let types = self.resource_types().await?;
        let total = self.repository.total_number_of_resources(&types).await?;
        self.cache.set(keys::TOTAL_NUMBER_OF_RESOURCES, &total)?;
        Ok(())
    }

    pub async fn refresh_number_of_properties(&self) -> ReportingResult<()> {
        self.cache.delete(keys::TOTAL_NUMBER_OF_PROPERTIES);
        self.cache.delete(keys::TOTAL_USAGE_COUNT_BY_PREDICATE);
        self.cache.delete(keys::RESOURCE_TYPE_HIERARCHY);

        let mut types = self.resource_types().await?;
        types.extend(self.vocabulary.ancestor_types());

        let properties = self
            .repository
            .all_properties_by_resource_types(&types)
            .await?;

        let excluded = self.vocabulary.excluded_report_groups();
        let reportable: Vec<String> = properties
            .iter()
            .filter(|p| p.is_reportable(&excluded))
            .map(|p| p.property_uri.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let usage = self.repository.usage_of_properties(&reportable).await?;
        let hierarchy = self
            .metadata
            .type_hierarchy(&self.vocabulary.first_resource_type)
            .await?;

        self.cache.set(keys::TOTAL_NUMBER_OF_PROPERTIES, &properties)?;
        self.cache.set(keys::TOTAL_USAGE_COUNT_BY_PREDICATE, &usage)?;
        self.cache.set(keys::RESOURCE_TYPE_HIERARCHY, &hierarchy)?;
        Ok(())
    }

    pub async fn refresh_property_word_count(&self, property: &Url) -> ReportingResult<()> {
        let key = keys::parameterized(keys::TOTAL_PROPERTY_VALUES_OF_ALL_RESOURCES, property.as_str());
        self.cache.delete(&key);

        let types = self.resource_types().await?;
        let (label, values) = self
            .repository
            .property_values_of_all_resources(property, &types)
            .await?;
        let total = self
            .repository
            .total_number_of_resources_by_predicate(property)
            .await?;

        let snapshot = WordCountSnapshot {
            label,
            word_counts: values.iter().map(|v| word_count(v)).collect(),
            total,
        };
        self.cache.set(&key, &snapshot)?;
        Ok(())
    }

    pub async fn refresh_versions_of_resources(&self) -> ReportingResult<()> {
        self.cache.delete(keys::TOTAL_NUMBER_OF_VERSIONS_OF_RESOURCES);
        let types = self.resource_types().await?;
        let version_counts = self
            .repository
            .number_of_versions_of_resources(&types)
            .await?;
        let total = self.repository.total_number_of_resources(&types).await?;

        let snapshot = VersionCountSnapshot {
            version_counts,
            total: Some(total),
        };
        self.cache
            .set(keys::TOTAL_NUMBER_OF_VERSIONS_OF_RESOURCES, &snapshot)?;
        Ok(())
    }

    pub async fn refresh_property_usage_by_group(&self, group: &Url) -> ReportingResult<()> {
        let key = Self::usage_by_group_key(group);
        self.cache.delete(&key);
        let result = self.compute_property_usage_by_group(group).await?;
        self.cache.set(&key, &result)?;
        Ok(())
    }

    pub async fn refresh_characteristics(&self, kind: Characteristic) -> ReportingResult<()> {
        self.cache.delete(kind.cache_key());
        let types = self.resource_types().await?;
        let repository = &self.repository;
        let characteristics = match kind {
            Characteristic::ResourceType => repository.resource_type_characteristics(&types).await,
            Characteristic::ConsumerGroup => {
                repository.consumer_group_characteristics(&types).await
            }
            Characteristic::InformationClassification => {
                repository
                    .information_classification_characteristics(&types)
                    .await
            }
            Characteristic::LifecycleStatus => {
                repository.lifecycle_status_characteristics(&types).await
            }
        }?;
        self.cache.set(kind.cache_key(), &characteristics)?;
        Ok(())
    }

    pub async fn refresh_controlled_vocabulary_selection(
        &self,
        property: &Url,
    ) -> ReportingResult<()> {
        let key = Self::controlled_vocabulary_key(property);
        self.cache.delete(&key);
        let result = self.compute_controlled_vocabulary_selection(property).await?;
        self.cache.set(&key, &result)?;
        Ok(())
    }

    fn usage_by_group_key(group: &Url) -> String {
        keys::parameterized(keys::TOTAL_NUMBER_OF_PROPERTY_USAGE_BY_GROUP, group.as_str())
    }

    fn controlled_vocabulary_key(property: &Url) -> String {
        keys::parameterized(keys::TOTAL_CONTROLLED_VOCABULARY_SELECTION, property.as_str())
    }

    async fn compute_property_usage_by_group(
        &self,
        group: &Url,
    ) -> ReportingResult<StatisticsResult> {
        let items = self.repository.number_of_property_usage_by_group(group).await?;
        Ok(StatisticsResult::new("", 0, items))
    }

    async fn compute_controlled_vocabulary_selection(
        &self,
        property: &Url,
    ) -> ReportingResult<StatisticsResult> {
        let types = self.resource_types().await?;
        Ok(self
            .repository
            .number_of_controlled_vocabulary_selection(property, &types)
            .await?)
    }

    fn store_on_demand(&self, key: &str, result: StatisticsResult) -> StatisticsResult {
        if let Err(e) = self.cache.set_on_demand(key, &result) {
            log::warn!("StatisticsService: {}", e);
        }
        result
    }

    // ---- write path, errors logged and swallowed ----

    pub async fn cache_total_number_of_resources(&self) {
        logged(
            "CacheTotalNumberOfResources",
            self.refresh_total_number_of_resources(),
        )
        .await
    }

    pub async fn cache_number_of_properties(&self) {
        logged("CacheNumberOfProperties", self.refresh_number_of_properties()).await
    }

    pub async fn cache_number_of_resources_in_relation_to_number_of_property_words(
        &self,
        property: &Url,
    ) {
        logged(
            "CacheNumberOfResourcesInRelationToNumberOfPropertyWords",
            self.refresh_property_word_count(property),
        )
        .await
    }

    pub async fn cache_number_of_versions_of_resources(&self) {
        logged(
            "CacheNumberOfVersionsOfResources",
            self.refresh_versions_of_resources(),
        )
        .await
    }

    pub async fn cache_number_of_property_usage_by_group(&self, group: &Url) {
        logged(
            "CacheNumberOfPropertyUsageByGroupOfResource",
            self.refresh_property_usage_by_group(group),
        )
        .await
    }

    pub async fn cache_resource_type_characteristics(&self) {
        self.cache_characteristics(Characteristic::ResourceType).await
    }

    pub async fn cache_consumer_group_characteristics(&self) {
        self.cache_characteristics(Characteristic::ConsumerGroup).await
    }

    pub async fn cache_information_classification_characteristics(&self) {
        self.cache_characteristics(Characteristic::InformationClassification)
            .await
    }

    pub async fn cache_lifecycle_status_characteristics(&self) {
        self.cache_characteristics(Characteristic::LifecycleStatus).await
    }

    async fn cache_characteristics(&self, kind: Characteristic) {
        logged(kind.operation(), self.refresh_characteristics(kind)).await
    }

    pub async fn cache_number_of_controlled_vocabulary_selection(&self, property: &Url) {
        logged(
            "CacheNumberOfControlledVocabularySelection",
            self.refresh_controlled_vocabulary_selection(property),
        )
        .await
    }

    // ---- read path ----

    /// Cached total, `None` until the first refresh
    pub fn get_total_number_of_resources(&self) -> Option<u64> {
        self.cache.get(keys::TOTAL_NUMBER_OF_RESOURCES)
    }

    /// Usage of every reportable property with the published total of its types
    ///
    /// Empty unless both the property list and the usage counts are cached.
    pub fn get_number_of_properties(&self) -> StatisticsResult {
        if !self.cache.exists(keys::TOTAL_NUMBER_OF_PROPERTIES)
            || !self.cache.exists(keys::TOTAL_USAGE_COUNT_BY_PREDICATE)
        {
            return StatisticsResult::empty();
        }

        let properties: Option<Vec<PropertyMetadata>> =
            self.cache.get(keys::TOTAL_NUMBER_OF_PROPERTIES);
        let usage: Option<Vec<PropertyUsage>> =
            self.cache.get(keys::TOTAL_USAGE_COUNT_BY_PREDICATE);
        let (Some(properties), Some(usage)) = (properties, usage) else {
            return StatisticsResult::empty();
        };

        let characteristics: Option<Vec<PropertyCharacteristic>> =
            self.cache.get(keys::TOTAL_RESOURCE_TYPE_CHARACTERISTICS);
        let hierarchy: Option<TypeNode> = self.cache.get(keys::RESOURCE_TYPE_HIERARCHY);

        build_property_statistics(
            &properties,
            &usage,
            characteristics.as_deref(),
            hierarchy.as_ref(),
            &self.vocabulary,
        )
    }

    /// Selection counts of a controlled vocabulary property, computed on a miss
    pub async fn get_number_of_controlled_vocabulary_selection(
        &self,
        property: Option<&str>,
    ) -> Result<StatisticsResult, ValidationError> {
        let property = require_uri("property", property)?;
        let key = Self::controlled_vocabulary_key(&property);
        if let Some(result) = self.cache.get_on_demand(&key) {
            return Ok(result);
        }

        match self.compute_controlled_vocabulary_selection(&property).await {
            Ok(result) => Ok(self.store_on_demand(&key, result)),
            Err(e) => {
                log::warn!(
                    "StatisticsService: Failed to compute controlled vocabulary selection for {} - {}",
                    property,
                    e
                );
                Ok(StatisticsResult::empty())
            }
        }
    }

    /// How many resources use how many properties of a group, computed on a miss
    pub async fn get_number_of_property_usage_by_group(
        &self,
        group: Option<&str>,
    ) -> Result<StatisticsResult, ValidationError> {
        let group = require_uri("group", group)?;
        let key = Self::usage_by_group_key(&group);
        if let Some(result) = self.cache.get_on_demand(&key) {
            return Ok(result);
        }

        match self.compute_property_usage_by_group(&group).await {
            Ok(result) => Ok(self.store_on_demand(&key, result)),
            Err(e) => {
                log::warn!(
                    "StatisticsService: Failed to compute property usage for group {} - {}",
                    group,
                    e
                );
                Ok(StatisticsResult::empty())
            }
        }
    }

    /// Histogram of the word counts of a property's values
    pub fn get_number_of_resources_in_relation_to_number_of_property_words(
        &self,
        property: Option<&str>,
        increment: i64,
    ) -> Result<StatisticsResult, ValidationError> {
        let property = require_uri("property", property)?;
        let increment = require_positive("increment", increment)?;

        let key = keys::parameterized(keys::TOTAL_PROPERTY_VALUES_OF_ALL_RESOURCES, property.as_str());
        let Some(snapshot) = self.cache.get::<WordCountSnapshot>(&key) else {
            return Ok(StatisticsResult::empty());
        };

        Ok(StatisticsResult::new(
            snapshot.label.unwrap_or_default(),
            increment,
            bucketize(&snapshot.word_counts, increment, snapshot.total),
        ))
    }

    /// Histogram of the number of later versions per resource
    pub fn get_number_of_versions_of_resources(
        &self,
        increment: i64,
    ) -> Result<StatisticsResult, ValidationError> {
        let increment = require_positive("increment", increment)?;

        let Some(snapshot) = self
            .cache
            .get::<VersionCountSnapshot>(keys::TOTAL_NUMBER_OF_VERSIONS_OF_RESOURCES)
        else {
            return Ok(StatisticsResult::empty());
        };

        Ok(StatisticsResult::new(
            VERSIONS_OF_RESOURCES_NAME,
            increment,
            bucketize(&snapshot.version_counts, increment, snapshot.total),
        ))
    }

    /// Cached characteristics, largest count first
    pub fn get_characteristics(&self, kind: Characteristic) -> Vec<PropertyCharacteristic> {
        let mut characteristics: Vec<PropertyCharacteristic> =
            self.cache.get(kind.cache_key()).unwrap_or_default();
        characteristics.sort_by(|a, b| b.count.cmp(&a.count));
        characteristics
    }

    pub fn get_resource_type_characteristics(&self) -> Vec<PropertyCharacteristic> {
        self.get_characteristics(Characteristic::ResourceType)
    }

    pub fn get_consumer_group_characteristics(&self) -> Vec<PropertyCharacteristic> {
        self.get_characteristics(Characteristic::ConsumerGroup)
    }

    pub fn get_information_classification_characteristics(&self) -> Vec<PropertyCharacteristic> {
        self.get_characteristics(Characteristic::InformationClassification)
    }

    pub fn get_lifecycle_status_characteristics(&self) -> Vec<PropertyCharacteristic> {
        self.get_characteristics(Characteristic::LifecycleStatus)
    }
}

#[async_trait]
impl Refresher for StatisticsService {
    async fn refresh(&self, task: &RefreshTask) -> ReportingResult<()> {
        match task {
            RefreshTask::TotalNumberOfResources => self.refresh_total_number_of_resources().await,
            RefreshTask::NumberOfProperties => self.refresh_number_of_properties().await,
            RefreshTask::PropertyWordCount(property) => {
                let property = require_uri("property", Some(property.as_str()))?;
                self.refresh_property_word_count(&property).await
            }
            RefreshTask::VersionsOfResources => self.refresh_versions_of_resources().await,
            RefreshTask::PropertyUsageByGroup(group) => {
                let group = require_uri("group", Some(group.as_str()))?;
                self.refresh_property_usage_by_group(&group).await
            }
            RefreshTask::ResourceTypeCharacteristics => {
                self.refresh_characteristics(Characteristic::ResourceType)
                    .await
            }
            RefreshTask::ConsumerGroupCharacteristics => {
                self.refresh_characteristics(Characteristic::ConsumerGroup)
                    .await
            }
            RefreshTask::LifecycleStatusCharacteristics => {
                self.refresh_characteristics(Characteristic::LifecycleStatus)
                    .await
            }
            RefreshTask::InformationClassificationCharacteristics => {
                self.refresh_characteristics(Characteristic::InformationClassification)
                    .await
            }
        }
    }
}

async fn logged(operation: &str, work: impl Future<Output = ReportingResult<()>>) {
    log::info!("StatisticsService: Started {}", operation);
    let start = Instant::now();
    match work.await {
        Ok(()) => log::info!(
            "StatisticsService: Finished {} in {}ms",
            operation,
            start.elapsed().as_millis()
        ),
        Err(e) => log::error!(
            "StatisticsService: Error {} in {}ms - {}",
            operation,
            start.elapsed().as_millis(),
            e
        ),
    }
}
