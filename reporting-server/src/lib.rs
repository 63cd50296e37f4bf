// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! REST surface of the reporting service
//!
//! Handlers only read: statistics come from the cache that the refresh
//! scheduler keeps populated.

pub mod error;
pub mod handlers;

pub use error::ApiError;

use axum::routing::get;
use axum::Router;
use graph_reporting::graph::{GraphQueryExecutor, SparqlHttpExecutor};
use graph_reporting::metadata::{MetadataService, SparqlMetadataService};
use graph_reporting::remote::{HttpRegistrationService, StaticTokenProvider};
use graph_reporting::repository::{SparqlContactRepository, SparqlStatisticsRepository};
use graph_reporting::{
    ContactService, ReportingConfig, ReportingResult, StatisticsCache, StatisticsService,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Services shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub statistics: Arc<StatisticsService>,
    pub contacts: Arc<ContactService>,
}

impl AppState {
    /// Wire the SPARQL-backed services described by `config`
    pub fn from_config(config: &ReportingConfig) -> ReportingResult<Self> {
        let vocabulary = config.vocabulary();

        let mut executor =
            SparqlHttpExecutor::new(config.sparql_endpoint.clone(), config.request_timeout())?;
        if let Some(token) = &config.access_token {
            executor = executor.with_auth_token(token.clone());
        }
        let executor: Arc<dyn GraphQueryExecutor> = Arc::new(executor);

        let metadata: Arc<dyn MetadataService> = Arc::new(SparqlMetadataService::new(
            executor.clone(),
            config.named_graphs.clone(),
            vocabulary.clone(),
            config.language.clone(),
        ));

        let statistics = StatisticsService::new(
            Arc::new(SparqlStatisticsRepository::new(
                executor.clone(),
                config.named_graphs.clone(),
                vocabulary.clone(),
                config.language.clone(),
            )),
            metadata.clone(),
            StatisticsCache::from_config(&config.cache),
            vocabulary.clone(),
        );

        let registration = HttpRegistrationService::new(
            config.registration_service_url.clone(),
            config.request_timeout(),
            Arc::new(StaticTokenProvider::new(config.access_token.clone())),
        )?;

        let contacts = ContactService::new(
            Arc::new(SparqlContactRepository::new(
                executor,
                config.named_graphs.clone(),
                vocabulary.clone(),
            )),
            metadata,
            Arc::new(registration),
            vocabulary,
        );

        Ok(Self {
            statistics: Arc::new(statistics),
            contacts: Arc::new(contacts),
        })
    }
}

/// Build the router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/statistics/resource/total",
            get(handlers::total_number_of_resources),
        )
        .route(
            "/api/statistics/resource/numberofproperties",
            get(handlers::number_of_properties),
        )
        .route(
            "/api/statistics/resource/controlledvocabularyselection",
            get(handlers::controlled_vocabulary_selection),
        )
        .route(
            "/api/statistics/resource/numberofresourcesinrelationtopropertylength",
            get(handlers::property_length),
        )
        .route(
            "/api/statistics/resource/numberofversionsofresources",
            get(handlers::versions_of_resources),
        )
        .route(
            "/api/statistics/resource/numberofpropertyusagebygroup",
            get(handlers::property_usage_by_group),
        )
        .route(
            "/api/statistics/resource/characteristics/{kind}",
            get(handlers::characteristics),
        )
        .route("/api/contact", get(handlers::contacts))
        .route(
            "/api/contact/{email}/colidEntries",
            get(handlers::contact_referenced_entries),
        )
        .layer(cors)
        .with_state(state)
}
