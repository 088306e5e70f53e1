//! Test utilities for creating throwaway databases
//!
//! Only available with the `test-utils` feature.

use crate::database::Database;
use crate::error::Result;
use crate::models::{CreateProjectRequest, CreateTaskRequest, EntityStatus, ProjectKind};
use sqlx::SqlitePool;
use std::path::Path;
use uuid::Uuid;

/// Create a database file with the full schema at `path`
///
/// The caller owns the path; pair this with `tempfile::NamedTempFile` so the
/// file outlives the pool.
///
/// # Errors
///
/// Returns an error if the pool cannot be created or schema creation fails
pub async fn create_test_database(path: &Path) -> Result<SqlitePool> {
    let db = Database::new(path).await?;
    db.initialize_schema().await?;
    Ok(db.pool().clone())
}

/// A minimal valid project creation payload
#[must_use]
pub fn sample_project_request(name: &str) -> CreateProjectRequest {
    CreateProjectRequest {
        name: name.to_string(),
        description: None,
        status: EntityStatus::NotStarted,
        start_date: None,
        deadline_date: None,
        parent_project_id: None,
        kind: ProjectKind::Project,
    }
}

/// A minimal valid task creation payload attached to `project_id`
#[must_use]
pub fn sample_task_request(name: &str, project_id: Uuid) -> CreateTaskRequest {
    CreateTaskRequest {
        name: name.to_string(),
        description: None,
        status: EntityStatus::NotStarted,
        start_date: None,
        deadline_date: None,
        project_id: Some(project_id),
        parent_task_id: None,
    }
}
