//! Saved filter CRUD and rule evaluation endpoints

use crate::error::ApiError;
use crate::server::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskly_common::constants::{DEFAULT_ITEMS_PER_PAGE, DEFAULT_PAGE};
use taskly_core::models::{
    CreateFilterRequest, FilterTarget, Project, SavedFilter, SavedFilterParams, Task,
    UpdateFilterRequest,
};
use taskly_core::{rules_to_conditions, spec_for_target, Pagination};
use uuid::Uuid;

pub async fn list_filters(
    State(state): State<AppState>,
    Query(params): Query<SavedFilterParams>,
) -> Result<Json<Vec<SavedFilter>>, ApiError> {
    let filters = state.filters.get_multi(&params).await?;
    Ok(Json(filters))
}

pub async fn create_filter(
    State(state): State<AppState>,
    Json(request): Json<CreateFilterRequest>,
) -> Result<(StatusCode, Json<SavedFilter>), ApiError> {
    let filter = state.filters.create(&request).await?;
    Ok((StatusCode::CREATED, Json(filter)))
}

pub async fn get_filter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SavedFilter>, ApiError> {
    let filter = state.filters.get(id).await?;
    Ok(Json(filter))
}

pub async fn update_filter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFilterRequest>,
) -> Result<Json<SavedFilter>, ApiError> {
    let filter = state.filters.update(id, &request).await?;
    Ok(Json(filter))
}

pub async fn delete_filter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.filters.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Pagination and ordering for a saved-filter evaluation; the conditions
/// themselves come from the persisted rules.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterResultParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(rename = "itemsPerPage", default = "default_items_per_page")]
    pub items_per_page: u32,
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_items_per_page() -> u32 {
    DEFAULT_ITEMS_PER_PAGE
}

/// Results of evaluating a saved filter against its target collection
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FilterResults {
    Projects(Vec<Project>),
    Tasks(Vec<Task>),
}

/// Evaluate a saved filter's rules against its target collection
pub async fn filter_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<FilterResultParams>,
) -> Result<Json<FilterResults>, ApiError> {
    let filter = state.filters.get(id).await?;
    let pagination = Pagination::new(params.page, params.items_per_page)?;
    let conditions = rules_to_conditions(spec_for_target(filter.target), &filter.rules)?;
    let order_by = params.order_by.as_deref();

    let results = match filter.target {
        FilterTarget::Project => FilterResults::Projects(
            state.projects.find(&conditions, order_by, pagination).await?,
        ),
        FilterTarget::Task => {
            FilterResults::Tasks(state.tasks.find(&conditions, order_by, pagination).await?)
        }
    };
    Ok(Json(results))
}
