// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Contact report value objects

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A contact person referenced by an entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub email_address: Option<String>,
    /// Role of the contact as a URI from the graph
    pub type_uri: Option<String>,
    /// Role label, e.g. "Data Steward"
    pub type_label: Option<String>,
    pub is_technical_contact: bool,
}

/// An entry together with all of its contacts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactReferencedEntry {
    pub pid_uri: Option<String>,
    pub label: Option<String>,
    pub contacts: Vec<Contact>,
    pub consumer_group_contact: Option<Contact>,
    #[serde(skip)]
    pub consumer_group: Option<String>,
}

/// Consumer group as returned by the registration service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerGroup {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, Vec<serde_json::Value>>,
}

impl ConsumerGroup {
    /// First string value of a property
    pub fn first_string(&self, property: &str) -> Option<&str> {
        self.properties
            .get(property)
            .and_then(|values| values.first())
            .and_then(|value| value.as_str())
    }
}
