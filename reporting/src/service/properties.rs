// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Number-of-properties report assembled from cached inputs

use crate::metadata::{aggregate_counts, collect_descendant_ids, find_node, TypeNode};
use crate::model::{
    PropertyCharacteristic, PropertyMetadata, PropertyUsage, StatisticItem, StatisticsResult,
};
use crate::vocab::Vocabulary;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const NUMBER_OF_PROPERTIES_NAME: &str = "Amount of properties";

/// Build the report: one item per reportable property with its usage count and
/// the number of published resources whose type declares it.
///
/// `total` stays empty when the type characteristics are not available.
pub fn build_property_statistics(
    properties: &[PropertyMetadata],
    usage: &[PropertyUsage],
    characteristics: Option<&[PropertyCharacteristic]>,
    hierarchy: Option<&TypeNode>,
    vocabulary: &Vocabulary,
) -> StatisticsResult {
    let excluded = vocabulary.excluded_report_groups();
    let usage: HashMap<&str, u64> = usage
        .iter()
        .map(|u| (u.property_uri.as_str(), u.usage_count))
        .collect();

    let mut declared: BTreeMap<&str, (Option<&str>, BTreeSet<&str>)> = BTreeMap::new();
    for property in properties.iter().filter(|p| p.is_reportable(&excluded)) {
        let (name, types) = declared
            .entry(property.property_uri.as_str())
            .or_insert((None, BTreeSet::new()));
        if name.is_none() {
            *name = property.property_name.as_deref();
        }
        types.insert(property.resource_type.as_str());
    }

    let ancestors = vocabulary.ancestor_types();
    let mut items: Vec<StatisticItem> = declared
        .into_iter()
        .map(|(uri, (name, types))| {
            let total = characteristics
                .map(|c| published_total(&types, c, hierarchy, &ancestors));
            StatisticItem::new(name.unwrap_or(uri), usage.get(uri).copied().unwrap_or(0))
                .with_property(uri)
                .with_total(total)
        })
        .collect();

    items.sort_by(|a, b| a.value.cmp(&b.value).then_with(|| a.key.cmp(&b.key)));

    StatisticsResult::new(NUMBER_OF_PROPERTIES_NAME, 0, items)
}

/// Published resources of every declaring type, counting each leaf type once
fn published_total(
    declaring: &BTreeSet<&str>,
    characteristics: &[PropertyCharacteristic],
    hierarchy: Option<&TypeNode>,
    ancestors: &[String],
) -> u64 {
    let is_ancestor = |t: &str| ancestors.iter().any(|a| a.as_str() == t);
    let declared_by_ancestor = declaring.iter().any(|t| is_ancestor(t));

    let Some(tree) = hierarchy else {
        if declared_by_ancestor {
            return characteristics.iter().map(|c| c.published_count).sum();
        }
        return characteristics
            .iter()
            .filter(|c| declaring.contains(c.key.as_str()))
            .map(|c| c.published_count)
            .sum();
    };

    // ancestor types sit above the hierarchy root and cover every type below it
    if declaring
        .iter()
        .any(|t| is_ancestor(t) && find_node(tree, t).is_none())
    {
        return aggregate_counts(tree, &tree.id, characteristics).1;
    }

    let below_other: BTreeSet<String> = declaring
        .iter()
        .flat_map(|t| collect_descendant_ids(tree, t))
        .collect();

    declaring
        .iter()
        .filter(|t| !below_other.contains(**t))
        .map(|t| {
            if find_node(tree, t).is_some() {
                aggregate_counts(tree, t, characteristics).1
            } else {
                characteristics
                    .iter()
                    .find(|c| c.key == *t)
                    .map(|c| c.published_count)
                    .unwrap_or(0)
            }
        })
        .sum()
}
