// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Refresh tasks and the default refresh plan

use crate::error::ReportingResult;
use crate::vocab::Vocabulary;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One statistic recomputed by the scheduler
///
/// Parameterized tasks carry the predicate or group URI as configured; it is
/// validated when the task runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task", content = "parameter")]
pub enum RefreshTask {
    TotalNumberOfResources,
    NumberOfProperties,
    PropertyWordCount(String),
    VersionsOfResources,
    PropertyUsageByGroup(String),
    ResourceTypeCharacteristics,
    ConsumerGroupCharacteristics,
    LifecycleStatusCharacteristics,
    InformationClassificationCharacteristics,
}

impl RefreshTask {
    /// Name of the write operation the task runs
    pub fn name(&self) -> &'static str {
        match self {
            RefreshTask::TotalNumberOfResources => "CacheTotalNumberOfResources",
            RefreshTask::NumberOfProperties => "CacheNumberOfProperties",
            RefreshTask::PropertyWordCount(_) => {
                "CacheNumberOfResourcesInRelationToNumberOfPropertyWords"
            }
            RefreshTask::VersionsOfResources => "CacheNumberOfVersionsOfResources",
            RefreshTask::PropertyUsageByGroup(_) => "CacheNumberOfPropertyUsageByGroupOfResource",
            RefreshTask::ResourceTypeCharacteristics => "CacheResourceTypeCharacteristics",
            RefreshTask::ConsumerGroupCharacteristics => "CacheConsumerGroupCharacteristics",
            RefreshTask::LifecycleStatusCharacteristics => "CacheLifecycleStatusCharacteristics",
            RefreshTask::InformationClassificationCharacteristics => {
                "CacheInformationClassificationCharacteristics"
            }
        }
    }

    pub fn parameter(&self) -> Option<&str> {
        match self {
            RefreshTask::PropertyWordCount(uri) | RefreshTask::PropertyUsageByGroup(uri) => {
                Some(uri)
            }
            _ => None,
        }
    }
}

impl fmt::Display for RefreshTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parameter() {
            Some(parameter) => write!(f, "{}({})", self.name(), parameter),
            None => f.write_str(self.name()),
        }
    }
}

/// The ten statistics of a refresh cycle in their fixed order
pub fn default_plan(vocabulary: &Vocabulary) -> Vec<RefreshTask> {
    vec![
        RefreshTask::TotalNumberOfResources,
        RefreshTask::NumberOfProperties,
        RefreshTask::PropertyWordCount(vocabulary.has_label.clone()),
        RefreshTask::PropertyWordCount(vocabulary.has_resource_definition.clone()),
        RefreshTask::VersionsOfResources,
        RefreshTask::PropertyUsageByGroup(vocabulary.groups.link_types.clone()),
        RefreshTask::ResourceTypeCharacteristics,
        RefreshTask::ConsumerGroupCharacteristics,
        RefreshTask::LifecycleStatusCharacteristics,
        RefreshTask::InformationClassificationCharacteristics,
    ]
}

/// Runs a refresh task, reporting failures to the scheduler
#[async_trait]
pub trait Refresher: Send + Sync {
    async fn refresh(&self, task: &RefreshTask) -> ReportingResult<()>;
}
