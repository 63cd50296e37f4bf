//! Test doubles for reporting integration tests
//!
//! - MockStatisticsRepository / MockContactRepository: canned data, call
//!   counters and failure injection per operation
//! - MockMetadataService: fixed type lists and hierarchy
//! - RecordingExecutor: records rendered queries, answers with canned rows
//! - InstantSleeper: records pauses without waiting, can cancel after N pauses
//! - MockRegistrationService: canned consumer groups or a failure status

#![allow(dead_code)]

use async_trait::async_trait;
use graph_reporting::error::{
    MetadataError, QueryError, RemoteServiceError, RepositoryError, RepositoryResult,
};
use graph_reporting::graph::{GraphQueryExecutor, ParameterizedQuery, QueryResultSet, ResultRow};
use graph_reporting::metadata::{MetadataService, TypeNode};
use graph_reporting::model::{
    ConsumerGroup, ContactReferencedEntry, PropertyCharacteristic, PropertyMetadata,
    PropertyUsage, StatisticItem, StatisticsResult,
};
use graph_reporting::remote::RegistrationService;
use graph_reporting::repository::{ContactRepository, StatisticsRepository};
use graph_reporting::scheduler::Sleeper;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

pub const BASE: &str = "https://pid.example.org/";

/// Route `log` output through the test harness, set RUST_LOG to see it
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn unavailable() -> RepositoryError {
    RepositoryError::Query(QueryError::Connection("graph store unavailable".to_string()))
}

/// Statistics repository returning fixed data
#[derive(Default)]
pub struct MockStatisticsRepository {
    pub total: u64,
    pub total_by_predicate: Option<u64>,
    pub property_label: Option<String>,
    pub property_values: Vec<String>,
    pub versions: Vec<u64>,
    pub usage_by_group: Vec<StatisticItem>,
    pub characteristics: Vec<PropertyCharacteristic>,
    pub properties: Vec<PropertyMetadata>,
    pub usage: Vec<PropertyUsage>,
    pub controlled_vocabulary: StatisticsResult,
    pub calls: AtomicUsize,
    pub failing: Mutex<HashSet<&'static str>>,
    pub failing_predicates: Mutex<HashSet<String>>,
    pub requested_types: Mutex<Vec<Vec<String>>>,
    pub requested_properties: Mutex<Vec<Vec<String>>>,
}

impl MockStatisticsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `operation` fail until `recover` is called
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.failing.lock().remove(operation);
    }

    /// Make predicate-specific operations fail for one predicate
    pub fn fail_predicate(&self, predicate: &str) {
        self.failing_predicates.lock().insert(predicate.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_types(&self) -> Vec<Vec<String>> {
        self.requested_types.lock().clone()
    }

    pub fn requested_properties(&self) -> Vec<Vec<String>> {
        self.requested_properties.lock().clone()
    }

    fn enter(&self, operation: &'static str) -> RepositoryResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().contains(operation) {
            return Err(unavailable());
        }
        Ok(())
    }

    fn enter_with_types(&self, operation: &'static str, types: &[String]) -> RepositoryResult<()> {
        self.requested_types.lock().push(types.to_vec());
        self.enter(operation)
    }

    fn check_predicate(&self, predicate: &Url) -> RepositoryResult<()> {
        if self.failing_predicates.lock().contains(predicate.as_str()) {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl StatisticsRepository for MockStatisticsRepository {
    async fn total_number_of_resources(&self, resource_types: &[String]) -> RepositoryResult<u64> {
        self.enter_with_types("total_number_of_resources", resource_types)?;
        Ok(self.total)
    }

    async fn total_number_of_resources_by_predicate(
        &self,
        predicate: &Url,
    ) -> RepositoryResult<Option<u64>> {
        self.enter("total_number_of_resources_by_predicate")?;
        self.check_predicate(predicate)?;
        Ok(self.total_by_predicate)
    }

    async fn number_of_controlled_vocabulary_selection(
        &self,
        predicate: &Url,
        resource_types: &[String],
    ) -> RepositoryResult<StatisticsResult> {
        self.enter_with_types("number_of_controlled_vocabulary_selection", resource_types)?;
        self.check_predicate(predicate)?;
        Ok(self.controlled_vocabulary.clone())
    }

    async fn property_values_of_all_resources(
        &self,
        predicate: &Url,
        resource_types: &[String],
    ) -> RepositoryResult<(Option<String>, Vec<String>)> {
        self.enter_with_types("property_values_of_all_resources", resource_types)?;
        self.check_predicate(predicate)?;
        Ok((self.property_label.clone(), self.property_values.clone()))
    }

    async fn number_of_versions_of_resources(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<u64>> {
        self.enter_with_types("number_of_versions_of_resources", resource_types)?;
        Ok(self.versions.clone())
    }

    async fn number_of_property_usage_by_group(
        &self,
        group: &Url,
    ) -> RepositoryResult<Vec<StatisticItem>> {
        self.enter("number_of_property_usage_by_group")?;
        self.check_predicate(group)?;
        Ok(self.usage_by_group.clone())
    }

    async fn resource_type_characteristics(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyCharacteristic>> {
        self.enter_with_types("resource_type_characteristics", resource_types)?;
        Ok(self.characteristics.clone())
    }

    async fn consumer_group_characteristics(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyCharacteristic>> {
        self.enter_with_types("consumer_group_characteristics", resource_types)?;
        Ok(self.characteristics.clone())
    }

    async fn information_classification_characteristics(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyCharacteristic>> {
        self.enter_with_types("information_classification_characteristics", resource_types)?;
        Ok(self.characteristics.clone())
    }

    async fn lifecycle_status_characteristics(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyCharacteristic>> {
        self.enter_with_types("lifecycle_status_characteristics", resource_types)?;
        Ok(self.characteristics.clone())
    }

    async fn all_properties_by_resource_types(
        &self,
        resource_types: &[String],
    ) -> RepositoryResult<Vec<PropertyMetadata>> {
        self.enter_with_types("all_properties_by_resource_types", resource_types)?;
        Ok(self.properties.clone())
    }

    async fn usage_of_properties(
        &self,
        properties: &[String],
    ) -> RepositoryResult<Vec<PropertyUsage>> {
        self.requested_properties.lock().push(properties.to_vec());
        self.enter("usage_of_properties")?;
        Ok(self.usage.clone())
    }
}

/// Metadata service with a fixed hierarchy
pub struct MockMetadataService {
    pub instantiable: Vec<String>,
    pub leaves: HashMap<String, Vec<String>>,
    pub hierarchy: TypeNode,
    failing: AtomicBool,
}

impl MockMetadataService {
    pub fn new(instantiable: Vec<String>, hierarchy: TypeNode) -> Self {
        Self {
            instantiable,
            leaves: HashMap::new(),
            hierarchy,
            failing: AtomicBool::new(false),
        }
    }

    pub fn with_leaves(mut self, root: &str, leaves: Vec<String>) -> Self {
        self.leaves.insert(root.to_string(), leaves);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self, root: &str) -> Result<(), MetadataError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MetadataError::TypeNotFound(root.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataService for MockMetadataService {
    async fn instantiable_types(&self, root: &str) -> Result<Vec<String>, MetadataError> {
        self.check(root)?;
        Ok(self.instantiable.clone())
    }

    async fn leaf_types(&self, root: &str) -> Result<Vec<String>, MetadataError> {
        self.check(root)?;
        Ok(self.leaves.get(root).cloned().unwrap_or_default())
    }

    async fn type_hierarchy(&self, root: &str) -> Result<TypeNode, MetadataError> {
        self.check(root)?;
        Ok(self.hierarchy.clone())
    }
}

/// Executor that records every rendered query
#[derive(Default)]
pub struct RecordingExecutor {
    queries: Mutex<Vec<String>>,
    responses: Mutex<VecDeque<Result<QueryResultSet, QueryError>>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows of the next query; an empty queue answers with no rows
    pub fn respond(&self, rows: Vec<ResultRow>) {
        self.responses
            .lock()
            .push_back(Ok(QueryResultSet::new(Vec::new(), rows)));
    }

    pub fn respond_error(&self, error: QueryError) {
        self.responses.lock().push_back(Err(error));
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl GraphQueryExecutor for RecordingExecutor {
    async fn execute(&self, query: &ParameterizedQuery) -> Result<QueryResultSet, QueryError> {
        self.queries.lock().push(query.render());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(QueryResultSet::empty()))
    }
}

/// Sleeper that returns immediately
#[derive(Default)]
pub struct InstantSleeper {
    sleeps: Mutex<Vec<Duration>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl InstantSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel `token` during the `count`-th pause
    pub fn cancelling_after(count: usize, token: CancellationToken) -> Self {
        Self {
            sleeps: Mutex::new(Vec::new()),
            cancel_after: Some((count, token)),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }
}

#[async_trait]
impl Sleeper for InstantSleeper {
    async fn sleep(&self, duration: Duration) {
        let count = {
            let mut sleeps = self.sleeps.lock();
            sleeps.push(duration);
            sleeps.len()
        };
        if let Some((limit, token)) = &self.cancel_after {
            if count >= *limit {
                token.cancel();
            }
        }
        tokio::task::yield_now().await;
    }
}

/// Registration service returning fixed consumer groups
#[derive(Default)]
pub struct MockRegistrationService {
    pub groups: Vec<ConsumerGroup>,
    pub failure: Option<u16>,
    pub calls: AtomicUsize,
}

impl MockRegistrationService {
    pub fn new(groups: Vec<ConsumerGroup>) -> Self {
        Self {
            groups,
            ..Default::default()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            failure: Some(status),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistrationService for MockRegistrationService {
    async fn active_consumer_groups(&self) -> Result<Vec<ConsumerGroup>, RemoteServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure {
            Some(status) => Err(RemoteServiceError::Status(status)),
            None => Ok(self.groups.clone()),
        }
    }
}

/// Contact repository returning fixed data
#[derive(Default)]
pub struct MockContactRepository {
    pub contacts: Vec<Option<String>>,
    pub entries: Vec<ContactReferencedEntry>,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<(String, Vec<String>, Vec<String>)>>,
}

impl MockContactRepository {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, Vec<String>, Vec<String>)> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ContactRepository for MockContactRepository {
    async fn get_contacts(&self) -> RepositoryResult<Vec<Option<String>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.contacts.clone())
    }

    async fn get_contact_referenced_entries(
        &self,
        email: &str,
        resource_types: &[String],
        contact_types: &[String],
    ) -> RepositoryResult<Vec<ContactReferencedEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push((
            email.to_string(),
            resource_types.to_vec(),
            contact_types.to_vec(),
        ));
        Ok(self.entries.clone())
    }
}
