// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Repositories translating statistic requests into graph queries
//!
//! Methods taking a resource type filter return an empty value (zero, empty
//! list, default result) for an empty filter without querying. Methods taking
//! a predicate or group URI reject non-http(s) URIs with
//! [`RepositoryError::InvalidFormat`](crate::error::RepositoryError::InvalidFormat)
//! before any query is built.

pub mod contact;
pub mod queries;
pub mod statistics;

pub use contact::SparqlContactRepository;
pub use statistics::SparqlStatisticsRepository;

use crate::error::RepositoryResult;
use crate::model::{
    ContactReferencedEntry, PropertyCharacteristic, PropertyMetadata, PropertyUsage,
    StatisticItem, StatisticsResult,
};
use async_trait::async_trait;
use url::Url;

/// Aggregate queries over resources
#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    /// Distinct published resources of the given types
    async fn total_number_of_resources(&self, resource_types: &[String]) -> RepositoryResult<u64>;

    /// Published resources whose type is in the domain of `predicate`
    async fn total_number_of_resources_by_predicate(
        &self,
        predicate: &Url,
    ) -> RepositoryResult<Option<u64>>;

    /// How often each controlled vocabulary value of `predicate` is selected
    async fn number_of_controlled_vocabulary_selection(
        &self,
        predicate: &Url,
        resource_types: &[String],
    ) -> RepositoryResult<StatisticsResult>;

    /// The property label and the value of `predicate` for every resource
    ///
    /// Resources without a value contribute an empty string.
    async fn property_values_of_all_resources(
        &self,
        predicate: &Url,
        resource_types: &[String],
    ) -> RepositoryResult<(Option<String>, Vec<String>)>;

    /// Number of later versions per version chain
    async fn number_of_versions_of_resources(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<u64>>;

    /// How many resources use how many properties of `group`
    async fn number_of_property_usage_by_group(
        &self,
        group: &Url,
    ) -> RepositoryResult<Vec<StatisticItem>>;

    async fn resource_type_characteristics(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyCharacteristic>>;

    async fn consumer_group_characteristics(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyCharacteristic>>;

    async fn information_classification_characteristics(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyCharacteristic>>;

    async fn lifecycle_status_characteristics(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyCharacteristic>>;

    /// Property shapes declared for the given types
    async fn all_properties_by_resource_types(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyMetadata>>;

    /// Usage count of every given property, zero for unused ones
    async fn usage_of_properties(&self, properties: &[String])
        -> RepositoryResult<Vec<PropertyUsage>>;
}

/// Contact lookups
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Every value of a person-typed property, unfiltered
    async fn get_contacts(&self) -> RepositoryResult<Vec<Option<String>>>;

    /// Entries in which `email` is a contact, with all of their contacts
    async fn get_contact_referenced_entries(
        &self,
        email: &str,
        resource_types: &[String],
        contact_types: &[String],
    ) -> RepositoryResult<Vec<ContactReferencedEntry>>;
}
