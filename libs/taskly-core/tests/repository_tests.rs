//! Integration tests for the generic repository over a real SQLite database

use sqlx::SqlitePool;
use tempfile::NamedTempFile;
use uuid::Uuid;

use taskly_core::models::{
    CreateFilterRequest, CreateTaskRequest, EntityStatus, FilterRule, FilterTarget, ProjectKind,
    TaskFilterParams, UpdateProjectRequest, UpdateTaskRequest,
};
use taskly_core::test_utils::{create_test_database, sample_project_request, sample_task_request};
use taskly_core::{
    FilterEntity, FilterOperator, ProjectEntity, Repository, TaskEntity, TasklyError,
};

async fn setup() -> (NamedTempFile, SqlitePool) {
    let temp_file = NamedTempFile::new().unwrap();
    let pool = create_test_database(temp_file.path()).await.unwrap();
    (temp_file, pool)
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let (_guard, pool) = setup().await;
    let projects: Repository<ProjectEntity> = Repository::new(pool);

    let created = projects
        .create(&sample_project_request("Home renovation"))
        .await
        .unwrap();

    assert_eq!(created.name, "Home renovation");
    assert_eq!(created.status, EntityStatus::NotStarted);
    assert_eq!(created.kind, ProjectKind::Project);

    let fetched = projects.get(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_unknown_id_is_not_found() {
    let (_guard, pool) = setup().await;
    let projects: Repository<ProjectEntity> = Repository::new(pool);

    let result = projects.get(Uuid::new_v4()).await;
    assert!(matches!(result, Err(TasklyError::NotFound { .. })));
}

#[tokio::test]
async fn test_partial_update_leaves_other_fields_untouched() {
    let (_guard, pool) = setup().await;
    let projects: Repository<ProjectEntity> = Repository::new(pool);

    let mut request = sample_project_request("Home renovation");
    request.description = Some("Kitchen and bathroom".to_string());
    let created = projects.create(&request).await.unwrap();

    let patch = UpdateProjectRequest {
        status: Some(EntityStatus::InProgress),
        ..Default::default()
    };
    let updated = projects.update(created.id, &patch).await.unwrap();

    assert_eq!(updated.status, EntityStatus::InProgress);
    assert_eq!(updated.name, "Home renovation");
    assert_eq!(updated.description.as_deref(), Some("Kitchen and bathroom"));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let (_guard, pool) = setup().await;
    let projects: Repository<ProjectEntity> = Repository::new(pool);

    let patch = UpdateProjectRequest {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    let result = projects.update(Uuid::new_v4(), &patch).await;
    assert!(matches!(result, Err(TasklyError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete_is_idempotent_via_not_found() {
    let (_guard, pool) = setup().await;
    let projects: Repository<ProjectEntity> = Repository::new(pool);

    let created = projects
        .create(&sample_project_request("Throwaway"))
        .await
        .unwrap();

    projects.delete(created.id).await.unwrap();

    let second = projects.delete(created.id).await;
    assert!(matches!(second, Err(TasklyError::NotFound { .. })));

    let get_after = projects.get(created.id).await;
    assert!(matches!(get_after, Err(TasklyError::NotFound { .. })));
}

#[tokio::test]
async fn test_task_create_rejects_both_parents() {
    let (_guard, pool) = setup().await;
    let tasks: Repository<TaskEntity> = Repository::new(pool);

    let request = CreateTaskRequest {
        name: "Ambiguous".to_string(),
        description: None,
        status: EntityStatus::NotStarted,
        start_date: None,
        deadline_date: None,
        project_id: Some(Uuid::new_v4()),
        parent_task_id: Some(Uuid::new_v4()),
    };
    let result = tasks.create(&request).await;
    assert!(matches!(result, Err(TasklyError::Validation { .. })));
}

#[tokio::test]
async fn test_task_create_rejects_missing_parent() {
    let (_guard, pool) = setup().await;
    let tasks: Repository<TaskEntity> = Repository::new(pool);

    let request = CreateTaskRequest {
        name: "Orphan".to_string(),
        description: None,
        status: EntityStatus::NotStarted,
        start_date: None,
        deadline_date: None,
        project_id: None,
        parent_task_id: None,
    };
    let result = tasks.create(&request).await;
    assert!(matches!(result, Err(TasklyError::Validation { .. })));
}

#[tokio::test]
async fn test_task_with_dangling_project_is_conflict() {
    let (_guard, pool) = setup().await;
    let tasks: Repository<TaskEntity> = Repository::new(pool);

    let request = sample_task_request("Dangling", Uuid::new_v4());
    let result = tasks.create(&request).await;
    assert!(matches!(result, Err(TasklyError::Conflict { .. })));
}

#[tokio::test]
async fn test_delete_project_with_tasks_is_conflict() {
    let (_guard, pool) = setup().await;
    let projects: Repository<ProjectEntity> = Repository::new(pool.clone());
    let tasks: Repository<TaskEntity> = Repository::new(pool);

    let project = projects
        .create(&sample_project_request("Busy project"))
        .await
        .unwrap();
    tasks
        .create(&sample_task_request("Child", project.id))
        .await
        .unwrap();

    let result = projects.delete(project.id).await;
    assert!(matches!(result, Err(TasklyError::Conflict { .. })));
}

#[tokio::test]
async fn test_list_tasks_by_project() {
    let (_guard, pool) = setup().await;
    let projects: Repository<ProjectEntity> = Repository::new(pool.clone());
    let tasks: Repository<TaskEntity> = Repository::new(pool);

    let home = projects
        .create(&sample_project_request("Home"))
        .await
        .unwrap();
    let work = projects
        .create(&sample_project_request("Work"))
        .await
        .unwrap();

    tasks
        .create(&sample_task_request("Paint walls", home.id))
        .await
        .unwrap();
    tasks
        .create(&sample_task_request("Fix faucet", home.id))
        .await
        .unwrap();
    tasks
        .create(&sample_task_request("File report", work.id))
        .await
        .unwrap();

    let params = TaskFilterParams {
        project_id: Some(home.id),
        ..Default::default()
    };
    let listed = tasks.get_multi(&params).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|t| t.project_id == Some(home.id)));
}

#[tokio::test]
async fn test_list_by_name_is_case_insensitive_substring() {
    let (_guard, pool) = setup().await;
    let projects: Repository<ProjectEntity> = Repository::new(pool);

    projects
        .create(&sample_project_request("Home renovation"))
        .await
        .unwrap();
    projects
        .create(&sample_project_request("Work backlog"))
        .await
        .unwrap();

    let params = taskly_core::models::ProjectFilterParams {
        name: Some("hom".to_string()),
        ..Default::default()
    };
    let listed = projects.get_multi(&params).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Home renovation");
}

#[tokio::test]
async fn test_default_params_list_everything() {
    let (_guard, pool) = setup().await;
    let projects: Repository<ProjectEntity> = Repository::new(pool);

    projects
        .create(&sample_project_request("Solo"))
        .await
        .unwrap();

    // Default-constructed params must be a valid first-page query
    let params = taskly_core::models::ProjectFilterParams::default();
    assert_eq!(params.page, 1);
    let listed = projects.get_multi(&params).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_name_search_treats_wildcards_literally() {
    let (_guard, pool) = setup().await;
    let projects: Repository<ProjectEntity> = Repository::new(pool);

    projects
        .create(&sample_project_request("100% done"))
        .await
        .unwrap();
    projects
        .create(&sample_project_request("1000 things"))
        .await
        .unwrap();

    let params = taskly_core::models::ProjectFilterParams {
        name: Some("100%".to_string()),
        ..Default::default()
    };
    let listed = projects.get_multi(&params).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "100% done");
}

#[tokio::test]
async fn test_unknown_order_field_is_validation_error() {
    let (_guard, pool) = setup().await;
    let tasks: Repository<TaskEntity> = Repository::new(pool);

    let params = TaskFilterParams {
        order_by: Some("priority".to_string()),
        ..Default::default()
    };
    let result = tasks.get_multi(&params).await;
    assert!(matches!(result, Err(TasklyError::Validation { .. })));
}

#[tokio::test]
async fn test_ordering_descending_by_name() {
    let (_guard, pool) = setup().await;
    let projects: Repository<ProjectEntity> = Repository::new(pool);

    for name in ["Alpha", "Charlie", "Bravo"] {
        projects
            .create(&sample_project_request(name))
            .await
            .unwrap();
    }

    let params = taskly_core::models::ProjectFilterParams {
        order_by: Some("-name".to_string()),
        ..Default::default()
    };
    let listed = projects.get_multi(&params).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Charlie", "Bravo", "Alpha"]);
}

#[tokio::test]
async fn test_task_update_move_between_projects() {
    let (_guard, pool) = setup().await;
    let projects: Repository<ProjectEntity> = Repository::new(pool.clone());
    let tasks: Repository<TaskEntity> = Repository::new(pool);

    let home = projects
        .create(&sample_project_request("Home"))
        .await
        .unwrap();
    let work = projects
        .create(&sample_project_request("Work"))
        .await
        .unwrap();
    let task = tasks
        .create(&sample_task_request("Movable", home.id))
        .await
        .unwrap();

    let patch = UpdateTaskRequest {
        project_id: Some(work.id),
        ..Default::default()
    };
    let moved = tasks.update(task.id, &patch).await.unwrap();
    assert_eq!(moved.project_id, Some(work.id));
    assert_eq!(moved.parent_task_id, None);
}

#[tokio::test]
async fn test_saved_filter_round_trip_and_rule_validation() {
    let (_guard, pool) = setup().await;
    let filters: Repository<FilterEntity> = Repository::new(pool);

    let valid = CreateFilterRequest {
        name: "Completed tasks".to_string(),
        description: None,
        target: FilterTarget::Task,
        rules: vec![FilterRule {
            field: "status".to_string(),
            operator: FilterOperator::Eq,
            value: serde_json::json!("completed"),
        }],
    };
    let created = filters.create(&valid).await.unwrap();
    let fetched = filters.get(created.id).await.unwrap();
    assert_eq!(fetched.rules.len(), 1);
    assert_eq!(fetched.target, FilterTarget::Task);

    let invalid = CreateFilterRequest {
        name: "Broken".to_string(),
        description: None,
        target: FilterTarget::Task,
        rules: vec![FilterRule {
            field: "kind".to_string(),
            operator: FilterOperator::Eq,
            value: serde_json::json!("area"),
        }],
    };
    let result = filters.create(&invalid).await;
    assert!(matches!(result, Err(TasklyError::Validation { .. })));
}
