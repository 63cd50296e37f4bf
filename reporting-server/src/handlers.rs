// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Request handlers

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use graph_reporting::error::ValidationError;
use graph_reporting::model::ContactReferencedEntry;
use graph_reporting::{Characteristic, PropertyCharacteristic, StatisticsResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PropertyParams {
    pub property: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GroupParams {
    pub group: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IncrementParams {
    pub property: Option<String>,
    pub increment: Option<i64>,
}

fn require_increment(increment: Option<i64>) -> Result<i64, ValidationError> {
    increment.ok_or_else(|| ValidationError::MissingParameter("increment".to_string()))
}

/// GET /api/statistics/resource/total
pub async fn total_number_of_resources(State(state): State<AppState>) -> Json<Option<u64>> {
    Json(state.statistics.get_total_number_of_resources())
}

/// GET /api/statistics/resource/numberofproperties
pub async fn number_of_properties(State(state): State<AppState>) -> Json<StatisticsResult> {
    Json(state.statistics.get_number_of_properties())
}

/// GET /api/statistics/resource/controlledvocabularyselection?property=
pub async fn controlled_vocabulary_selection(
    State(state): State<AppState>,
    Query(params): Query<PropertyParams>,
) -> Result<Json<StatisticsResult>, ApiError> {
    let result = state
        .statistics
        .get_number_of_controlled_vocabulary_selection(params.property.as_deref())
        .await?;
    Ok(Json(result))
}

/// GET /api/statistics/resource/numberofresourcesinrelationtopropertylength?property=&increment=
pub async fn property_length(
    State(state): State<AppState>,
    Query(params): Query<IncrementParams>,
) -> Result<Json<StatisticsResult>, ApiError> {
    let increment = require_increment(params.increment)?;
    let result = state
        .statistics
        .get_number_of_resources_in_relation_to_number_of_property_words(
            params.property.as_deref(),
            increment,
        )?;
    Ok(Json(result))
}

/// GET /api/statistics/resource/numberofversionsofresources?increment=
pub async fn versions_of_resources(
    State(state): State<AppState>,
    Query(params): Query<IncrementParams>,
) -> Result<Json<StatisticsResult>, ApiError> {
    let increment = require_increment(params.increment)?;
    Ok(Json(
        state
            .statistics
            .get_number_of_versions_of_resources(increment)?,
    ))
}

/// GET /api/statistics/resource/numberofpropertyusagebygroup?group=
pub async fn property_usage_by_group(
    State(state): State<AppState>,
    Query(params): Query<GroupParams>,
) -> Result<Json<StatisticsResult>, ApiError> {
    let result = state
        .statistics
        .get_number_of_property_usage_by_group(params.group.as_deref())
        .await?;
    Ok(Json(result))
}

/// GET /api/statistics/resource/characteristics/{kind}
pub async fn characteristics(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<PropertyCharacteristic>>, ApiError> {
    let kind: Characteristic = kind.parse().map_err(ApiError::NotFound)?;
    Ok(Json(state.statistics.get_characteristics(kind)))
}

/// GET /api/contact
pub async fn contacts(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.contacts.get_contacts().await?))
}

/// GET /api/contact/{email}/colidEntries
pub async fn contact_referenced_entries(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<ContactReferencedEntry>>, ApiError> {
    let entries = state
        .contacts
        .get_contact_referenced_entries(Some(&email))
        .await?;
    Ok(Json(entries))
}

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    version: &'static str,
}

/// GET /health
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: graph_reporting::VERSION,
    })
}
