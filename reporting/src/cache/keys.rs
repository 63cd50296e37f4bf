// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Well-known cache keys
//!
//! Parameterized statistics append `:<parameter>` to the base key.

pub const TOTAL_NUMBER_OF_RESOURCES: &str = "totalnumberofresources";
pub const TOTAL_NUMBER_OF_PROPERTIES: &str = "totalnumberofproperties";
pub const TOTAL_PROPERTY_VALUES_OF_ALL_RESOURCES: &str = "totalpropertyvaluesofallresources";
pub const TOTAL_NUMBER_OF_VERSIONS_OF_RESOURCES: &str = "totalnumberofversionsofresources";
pub const TOTAL_NUMBER_OF_PROPERTY_USAGE_BY_GROUP: &str =
    "totalnumberofpropertyusagebygroupofresource";
pub const TOTAL_RESOURCE_TYPE_CHARACTERISTICS: &str = "totalresourcetypecharacteristics";
pub const TOTAL_CONSUMER_GROUP_CHARACTERISTICS: &str = "totalconsumergroupcharacteristics";
pub const TOTAL_INFORMATION_CLASSIFICATION_CHARACTERISTICS: &str =
    "totalinformationclassificationcharacteristics";
pub const TOTAL_LIFECYCLE_STATUS_CHARACTERISTICS: &str = "totallifecyclestatuscharacteristics";
pub const TOTAL_USAGE_COUNT_BY_PREDICATE: &str = "totalusagecountbypredicate";
pub const TOTAL_CONTROLLED_VOCABULARY_SELECTION: &str = "totalcontrolledvocabularyselection";
pub const RESOURCE_TYPE_HIERARCHY: &str = "resourcetypehierarchy";

/// Key of a statistic computed for one parameter, e.g. a predicate URI
pub fn parameterized(base: &str, parameter: &str) -> String {
    format!("{}:{}", base, parameter)
}
