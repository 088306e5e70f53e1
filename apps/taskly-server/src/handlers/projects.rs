//! Project CRUD endpoints

use crate::error::ApiError;
use crate::server::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use taskly_core::models::{
    CreateProjectRequest, Project, ProjectFilterParams, UpdateProjectRequest,
};
use uuid::Uuid;

pub async fn list_projects(
    State(state): State<AppState>,
    Query(params): Query<ProjectFilterParams>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = state.projects.get_multi(&params).await?;
    Ok(Json(projects))
}

pub async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = state.projects.create(&request).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, ApiError> {
    let project = state.projects.get(id).await?;
    Ok(Json(project))
}

pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    let project = state.projects.update(id, &request).await?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.projects.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
