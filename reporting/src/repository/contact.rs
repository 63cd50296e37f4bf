// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Contact repository over the SPARQL executor

use super::queries;
use super::ContactRepository;
use crate::error::RepositoryResult;
use crate::graph::{join_as_from_named_graphs, GraphQueryExecutor, NamedGraphs, ParameterizedQuery};
use crate::model::{Contact, ContactReferencedEntry};
use crate::vocab::Vocabulary;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

pub struct SparqlContactRepository {
    executor: Arc<dyn GraphQueryExecutor>,
    graphs: NamedGraphs,
    vocabulary: Vocabulary,
}

impl SparqlContactRepository {
    pub fn new(
        executor: Arc<dyn GraphQueryExecutor>,
        graphs: NamedGraphs,
        vocabulary: Vocabulary,
    ) -> Self {
        Self {
            executor,
            graphs,
            vocabulary,
        }
    }

    fn contact_query(&self, template: &str) -> ParameterizedQuery {
        let mut query = ParameterizedQuery::new(template);
        query
            .set_plain_literal("fromResources", self.graphs.resources_from())
            .set_plain_literal("fromMetadata", self.graphs.metadata_from())
            .set_plain_literal(
                "fromEnterpriseCore",
                join_as_from_named_graphs(&self.graphs.enterprise_core),
            )
            .set_plain_literal(
                "fromShacl",
                join_as_from_named_graphs(&self.graphs.shacl_constraints),
            );
        query
    }
}

#[async_trait]
impl ContactRepository for SparqlContactRepository {
    async fn get_contacts(&self) -> RepositoryResult<Vec<Option<String>>> {
        let mut query = self.contact_query(queries::CONTACTS);
        query.set_uri("person", &self.vocabulary.person);

        let result = self.executor.execute(&query).await?;
        Ok(result
            .rows
            .iter()
            .map(|row| row.get_string("contact"))
            .collect())
    }

    async fn get_contact_referenced_entries(
        &self,
        email: &str,
        resource_types: &[String],
        contact_types: &[String],
    ) -> RepositoryResult<Vec<ContactReferencedEntry>> {
        if resource_types.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = self.contact_query(queries::CONTACT_REFERENCED_ENTRIES);
        query
            .set_uri_list("resourceTypes", resource_types)
            .set_uri_list("contactTypes", contact_types)
            .set_literal("userEmailAddress", email)
            .set_uri("hasLabel", &self.vocabulary.has_label)
            .set_uri("hasPid", &self.vocabulary.pid_uri)
            .set_uri("hasPidEntryDraft", &self.vocabulary.has_pid_entry_draft)
            .set_uri("hasConsumerGroup", &self.vocabulary.has_consumer_group)
            .set_uri("distribution", &self.vocabulary.distribution)
            .set_uri("mainDistribution", &self.vocabulary.main_distribution);

        let result = self.executor.execute(&query).await?;

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut entries: Vec<ContactReferencedEntry> = Vec::new();
        for row in &result.rows {
            let Some(subject) = row.get_string("subject") else {
                continue;
            };

            let position = *index.entry(subject).or_insert_with(|| {
                entries.push(ContactReferencedEntry {
                    pid_uri: non_blank(row.get_string("pidUri")),
                    label: row.get_string("label"),
                    contacts: Vec::new(),
                    consumer_group_contact: None,
                    consumer_group: non_blank(row.get_string("consumerGroup")),
                });
                entries.len() - 1
            });

            entries[position].contacts.push(Contact {
                email_address: row.get_string("contact"),
                type_uri: non_blank(row.get_string("predicate")),
                type_label: row.get_string("predicateLabel"),
                is_technical_contact: row
                    .get("shaclGroup")
                    .map(|group| self.vocabulary.is_technical_group(group))
                    .unwrap_or(false),
            });
        }

        Ok(entries)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
