//! Task CRUD endpoints

use crate::error::ApiError;
use crate::server::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use taskly_core::models::{CreateTaskRequest, Task, TaskFilterParams, UpdateTaskRequest};
use uuid::Uuid;

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<TaskFilterParams>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.tasks.get_multi(&params).await?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.tasks.create(&request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    let task = state.tasks.get(id).await?;
    Ok(Json(task))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let task = state.tasks.update(id, &request).await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.tasks.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
