// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Knowledge graph vocabulary
//!
//! Every URI the queries refer to is derived from the configured service
//! namespace, so one deployment can point at a different graph without code
//! changes.

use serde::{Deserialize, Serialize};

const RESOURCE_PATH: &str = "kos/19050/";
const ENTERPRISE_CORE_PATH: &str = "kos/19014/";

/// Property groups used to classify SHACL property shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyGroups {
    pub link_types: String,
    pub distribution_endpoints: String,
    pub technical_information: String,
    pub invisible_technical_information: String,
}

/// URIs of the resource schema, resolved against a namespace base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub service_url: String,

    /// Root of all resource types
    pub first_resource_type: String,
    pub person: String,

    pub pid_uri: String,
    pub has_pid_entry_draft: String,
    pub has_label: String,
    pub has_resource_definition: String,
    pub has_later_version: String,
    pub has_consumer_group: String,
    pub has_information_classification: String,
    pub has_lifecycle_status: String,
    pub is_abstract: String,
    pub distribution: String,
    pub main_distribution: String,
    pub consumer_group_contact_person: String,

    pub lifecycle_draft: String,
    pub lifecycle_published: String,

    pub groups: PropertyGroups,

    /// Parent classes that carry property declarations of their own
    pub resources_parent_type: String,
    pub core_entities_parent_type: String,
}

impl Vocabulary {
    /// Build the vocabulary for a namespace base such as `https://pid.example.org/`
    pub fn new(service_url: &str) -> Self {
        let base = if service_url.ends_with('/') {
            service_url.to_string()
        } else {
            format!("{}/", service_url)
        };
        let res = |name: &str| format!("{}{}{}", base, RESOURCE_PATH, name);
        let eco = |name: &str| format!("{}{}{}", base, ENTERPRISE_CORE_PATH, name);

        Self {
            first_resource_type: res("PID_Concept"),
            person: eco("Person"),
            pid_uri: eco("hasPID"),
            has_pid_entry_draft: res("hasDraft"),
            has_label: res("hasLabel"),
            has_resource_definition: res("hasResourceDefinition"),
            has_later_version: res("hasLaterVersion"),
            has_consumer_group: res("hasConsumerGroup"),
            has_information_classification: res("hasInformationClassification"),
            has_lifecycle_status: res("hasEntryLifecycleStatus"),
            is_abstract: res("isAbstract"),
            distribution: res("distribution"),
            main_distribution: res("mainDistribution"),
            consumer_group_contact_person: res("hasContactPerson"),
            lifecycle_draft: res("draft"),
            lifecycle_published: res("published"),
            groups: PropertyGroups {
                link_types: res("LinkTypes"),
                distribution_endpoints: res("DistributionEndpoints"),
                technical_information: res("TechnicalInformation"),
                invisible_technical_information: res("InvisibleTechnicalInformation"),
            },
            resources_parent_type: res("444556"),
            core_entities_parent_type: res("444558"),
            service_url: base,
        }
    }

    /// Parent types whose property declarations are inherited by instantiable types
    pub fn ancestor_types(&self) -> Vec<String> {
        vec![
            self.resources_parent_type.clone(),
            self.core_entities_parent_type.clone(),
        ]
    }

    /// Groups whose properties are left out of the property usage report
    pub fn excluded_report_groups(&self) -> [&str; 3] {
        [
            self.groups.link_types.as_str(),
            self.groups.distribution_endpoints.as_str(),
            self.groups.invisible_technical_information.as_str(),
        ]
    }

    /// Groups whose contacts are flagged as technical contacts
    pub fn is_technical_group(&self, group: &str) -> bool {
        group == self.groups.technical_information
            || group == self.groups.invisible_technical_information
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new("https://pid.bayer.com/")
    }
}
