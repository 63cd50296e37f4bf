// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Contact reports
//!
//! Lists contact addresses and the entries a person is a contact of. Entries
//! that belong to a consumer group get the group's contact person attached,
//! as reported by the registration service.

use crate::error::ReportingResult;
use crate::metadata::MetadataService;
use crate::model::{Contact, ContactReferencedEntry};
use crate::remote::RegistrationService;
use crate::repository::ContactRepository;
use crate::validation::require_not_blank;
use crate::vocab::Vocabulary;
use std::sync::Arc;

pub const CONSUMER_GROUP_CONTACT_LABEL: &str = "Consumer group contact";

pub struct ContactService {
    repository: Arc<dyn ContactRepository>,
    metadata: Arc<dyn MetadataService>,
    registration: Arc<dyn RegistrationService>,
    vocabulary: Vocabulary,
}

impl ContactService {
    pub fn new(
        repository: Arc<dyn ContactRepository>,
        metadata: Arc<dyn MetadataService>,
        registration: Arc<dyn RegistrationService>,
        vocabulary: Vocabulary,
    ) -> Self {
        Self {
            repository,
            metadata,
            registration,
            vocabulary,
        }
    }

    /// Every non-blank contact address
    pub async fn get_contacts(&self) -> ReportingResult<Vec<String>> {
        let contacts = self.repository.get_contacts().await?;
        Ok(contacts
            .into_iter()
            .flatten()
            .filter(|c| !c.trim().is_empty())
            .collect())
    }

    /// Entries referencing `email` as a contact
    pub async fn get_contact_referenced_entries(
        &self,
        email: Option<&str>,
    ) -> ReportingResult<Vec<ContactReferencedEntry>> {
        let email = require_not_blank("userEmailAddress", email)?;

        let resource_types = self
            .metadata
            .leaf_types(&self.vocabulary.first_resource_type)
            .await?;
        let contact_types = self.metadata.leaf_types(&self.vocabulary.person).await?;

        let mut entries = self
            .repository
            .get_contact_referenced_entries(email, &resource_types, &contact_types)
            .await?;
        let consumer_groups = self.registration.active_consumer_groups().await?;

        let contact_property = self.vocabulary.consumer_group_contact_person.as_str();
        for entry in entries.iter_mut() {
            let Some(group_id) = entry.consumer_group.as_deref() else {
                continue;
            };
            let Some(group) = consumer_groups.iter().find(|g| g.id == group_id) else {
                continue;
            };
            if !group.properties.contains_key(contact_property) {
                continue;
            }
            entry.consumer_group_contact = Some(Contact {
                email_address: group.first_string(contact_property).map(str::to_string),
                type_uri: Some(contact_property.to_string()),
                type_label: Some(CONSUMER_GROUP_CONTACT_LABEL.to_string()),
                is_technical_contact: false,
            });
        }

        Ok(entries)
    }
}
