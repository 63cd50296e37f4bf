//! Router tests against in-memory collaborators
//!
//! The graph executor answers every query with an empty result, so anything
//! served here comes from the cache or from the lazy population path.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use graph_reporting::cache::{keys, MemoryCacheStore};
use graph_reporting::error::{QueryError, RemoteServiceError};
use graph_reporting::graph::{GraphQueryExecutor, NamedGraphs, ParameterizedQuery, QueryResultSet};
use graph_reporting::metadata::SparqlMetadataService;
use graph_reporting::model::{ConsumerGroup, PropertyCharacteristic};
use graph_reporting::remote::RegistrationService;
use graph_reporting::repository::{SparqlContactRepository, SparqlStatisticsRepository};
use graph_reporting::{
    ContactService, StatisticsCache, StatisticsService, Vocabulary,
};
use graph_reporting_server::{router, AppState};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct EmptyExecutor;

#[async_trait]
impl GraphQueryExecutor for EmptyExecutor {
    async fn execute(&self, _query: &ParameterizedQuery) -> Result<QueryResultSet, QueryError> {
        Ok(QueryResultSet::empty())
    }
}

struct FailingRegistration;

#[async_trait]
impl RegistrationService for FailingRegistration {
    async fn active_consumer_groups(&self) -> Result<Vec<ConsumerGroup>, RemoteServiceError> {
        Err(RemoteServiceError::Status(503))
    }
}

fn state() -> AppState {
    let vocabulary = Vocabulary::new("https://pid.example.org/");
    let executor: Arc<dyn GraphQueryExecutor> = Arc::new(EmptyExecutor);
    let graphs = NamedGraphs::default();
    let metadata = Arc::new(SparqlMetadataService::new(
        executor.clone(),
        graphs.clone(),
        vocabulary.clone(),
        "en",
    ));

    let statistics = StatisticsService::new(
        Arc::new(SparqlStatisticsRepository::new(
            executor.clone(),
            graphs.clone(),
            vocabulary.clone(),
            "en",
        )),
        metadata.clone(),
        StatisticsCache::new(
            Arc::new(MemoryCacheStore::default()),
            Duration::from_secs(60),
        ),
        vocabulary.clone(),
    );
    let contacts = ContactService::new(
        Arc::new(SparqlContactRepository::new(executor, graphs, vocabulary.clone())),
        metadata,
        Arc::new(FailingRegistration),
        vocabulary,
    );

    AppState {
        statistics: Arc::new(statistics),
        contacts: Arc::new(contacts),
    }
}

async fn get(state: AppState, uri: &str) -> (StatusCode, Value) {
    let response = router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(state(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_total_is_null_until_cached() {
    let state = state();
    let (status, body) = get(state.clone(), "/api/statistics/resource/total").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    state
        .statistics
        .cache()
        .set(keys::TOTAL_NUMBER_OF_RESOURCES, &42u64)
        .unwrap();
    let (_, body) = get(state, "/api/statistics/resource/total").await;
    assert_eq!(body, 42);
}

#[tokio::test]
async fn test_uncached_report_is_empty_result() {
    let (status, body) = get(state(), "/api/statistics/resource/numberofproperties").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "");
    assert_eq!(body["increment"], 0);
    assert_eq!(body["counts"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_invalid_parameters_are_bad_requests() {
    let uris = [
        "/api/statistics/resource/controlledvocabularyselection",
        "/api/statistics/resource/controlledvocabularyselection?property=not-a-uri",
        "/api/statistics/resource/numberofpropertyusagebygroup?group=urn:x:y",
        "/api/statistics/resource/numberofversionsofresources?increment=0",
        "/api/statistics/resource/numberofversionsofresources",
        "/api/statistics/resource/numberofresourcesinrelationtopropertylength?property=https://pid.example.org/kos/19050/hasLabel&increment=-1",
    ];
    for uri in uris {
        let (status, _) = get(state(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_versions_are_bucketed_on_read() {
    let state = state();
    state
        .statistics
        .cache()
        .set(
            keys::TOTAL_NUMBER_OF_VERSIONS_OF_RESOURCES,
            &serde_json::json!({
                "versionCounts": [1, 2, 3, 5, 11, 15, 17, 19, 20, 50],
                "total": 10
            }),
        )
        .unwrap();

    let (status, body) = get(
        state,
        "/api/statistics/resource/numberofversionsofresources?increment=10",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Amount of resource versions");
    assert_eq!(body["increment"], 10);
    let keys: Vec<&str> = body["counts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["10", "20", "50"]);
}

#[tokio::test]
async fn test_characteristics_sorted_by_count() {
    let state = state();
    state
        .statistics
        .cache()
        .set(
            keys::TOTAL_LIFECYCLE_STATUS_CHARACTERISTICS,
            &vec![
                PropertyCharacteristic::new("draft", None, 3, 0),
                PropertyCharacteristic::new("published", None, 0, 9),
            ],
        )
        .unwrap();

    let (status, body) = get(
        state.clone(),
        "/api/statistics/resource/characteristics/lifecyclestatus",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["key"], "published");
    assert_eq!(body[1]["key"], "draft");

    let (status, body) = get(state, "/api/statistics/resource/characteristics/type").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_characteristic_is_not_found() {
    let (status, _) = get(state(), "/api/statistics/resource/characteristics/colour").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_lazy_report_with_failing_upstream_is_empty() {
    // the metadata lookup finds no types, so the computation fails
    let (status, body) = get(
        state(),
        "/api/statistics/resource/controlledvocabularyselection?property=https://pid.example.org/kos/19050/hasLifecycleStatus",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["counts"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_contacts_listing() {
    let (status, body) = get(state(), "/api/contact").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_contact_entries_errors() {
    let (status, _) = get(state(), "/api/contact/%20/colidEntries").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // type lookup fails before the registration service is called
    let (status, _) = get(state(), "/api/contact/someone@example.org/colidEntries").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
