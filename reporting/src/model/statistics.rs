// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Statistic value objects

use serde::{Deserialize, Serialize};

/// One bucketed count, e.g. a property usage count or a histogram bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticItem {
    pub key: String,
    pub value: u64,
    pub property: Option<String>,
    pub total: Option<u64>,
}

impl StatisticItem {
    pub fn new(key: impl Into<String>, value: u64) -> Self {
        Self {
            key: key.into(),
            value,
            property: None,
            total: None,
        }
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn with_total(mut self, total: Option<u64>) -> Self {
        self.total = total;
        self
    }
}

/// A complete statistic as served to clients
///
/// The default instance (no name, increment 0, no items) means the statistic
/// has not been computed yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResult {
    pub name: String,
    /// Bucket width, 0 when the counts are not bucketed
    pub increment: u64,
    pub counts: Vec<StatisticItem>,
}

impl StatisticsResult {
    pub fn new(name: impl Into<String>, increment: u64, counts: Vec<StatisticItem>) -> Self {
        Self {
            name: name.into(),
            increment,
            counts,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Resource counts for one value of a categorical dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCharacteristic {
    pub key: String,
    pub name: Option<String>,
    pub count: u64,
    pub draft_count: u64,
    pub published_count: u64,
}

impl PropertyCharacteristic {
    pub fn new(key: impl Into<String>, name: Option<String>, draft: u64, published: u64) -> Self {
        Self {
            key: key.into(),
            name,
            count: draft + published,
            draft_count: draft,
            published_count: published,
        }
    }
}

/// A property declared for a resource type by a SHACL shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMetadata {
    pub group: Option<String>,
    pub resource_type: String,
    pub shacl_constraint: Option<String>,
    pub property_uri: String,
    pub property_name: Option<String>,
    pub is_mandatory: bool,
}

impl PropertyMetadata {
    /// Whether the property belongs in the property usage report
    ///
    /// Mandatory properties are always present, and link, distribution
    /// endpoint and invisible technical properties are not user-facing.
    pub fn is_reportable(&self, excluded_groups: &[&str]) -> bool {
        if self.is_mandatory {
            return false;
        }
        match &self.group {
            Some(group) => !excluded_groups.contains(&group.as_str()),
            None => true,
        }
    }
}

/// Number of distinct published resources using a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyUsage {
    pub property_uri: String,
    pub usage_count: u64,
}

/// Raw input of the word count report, bucketed on read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCountSnapshot {
    pub label: Option<String>,
    pub word_counts: Vec<u64>,
    pub total: Option<u64>,
}

/// Raw input of the versions report, bucketed on read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionCountSnapshot {
    pub version_counts: Vec<u64>,
    pub total: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_result_json_shape() {
        let result = StatisticsResult::new(
            "Amount of resource versions",
            5,
            vec![StatisticItem::new("5", 3).with_total(Some(10))],
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["name"], "Amount of resource versions");
        assert_eq!(json["increment"], 5);
        assert_eq!(json["counts"][0]["key"], "5");
        assert_eq!(json["counts"][0]["value"], 3);
        assert_eq!(json["counts"][0]["total"], 10);
        assert!(json["counts"][0]["property"].is_null());
    }

    #[test]
    fn test_characteristic_count_is_sum() {
        let c = PropertyCharacteristic::new("t", Some("Dataset".into()), 2, 5);
        assert_eq!(c.count, 7);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["draftCount"], 2);
        assert_eq!(json["publishedCount"], 5);
    }

    #[test]
    fn test_property_is_reportable() {
        let excluded = ["g:links", "g:endpoints"];
        let mut property = PropertyMetadata {
            group: Some("g:general".into()),
            resource_type: "t".into(),
            shacl_constraint: None,
            property_uri: "p".into(),
            property_name: Some("Keyword".into()),
            is_mandatory: false,
        };
        assert!(property.is_reportable(&excluded));

        property.group = Some("g:links".into());
        assert!(!property.is_reportable(&excluded));

        property.group = None;
        property.is_mandatory = true;
        assert!(!property.is_reportable(&excluded));
    }
}
