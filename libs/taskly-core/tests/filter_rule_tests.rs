//! Saved-filter rules: validation and evaluation through the query pipeline

use tempfile::NamedTempFile;

use taskly_core::models::{
    CreateFilterRequest, EntityStatus, FilterRule, FilterTarget, UpdateFilterRequest,
    UpdateTaskRequest,
};
use taskly_core::test_utils::{create_test_database, sample_project_request, sample_task_request};
use taskly_core::{
    rules_to_conditions, spec_for_target, FilterEntity, FilterOperator, Pagination, ProjectEntity,
    Repository, TaskEntity, TasklyError,
};

fn status_rule(value: &str) -> FilterRule {
    FilterRule {
        field: "status".to_string(),
        operator: FilterOperator::Eq,
        value: serde_json::json!(value),
    }
}

#[tokio::test]
async fn test_saved_filter_results_through_find() {
    let temp_file = NamedTempFile::new().unwrap();
    let pool = create_test_database(temp_file.path()).await.unwrap();
    let projects: Repository<ProjectEntity> = Repository::new(pool.clone());
    let tasks: Repository<TaskEntity> = Repository::new(pool.clone());
    let filters: Repository<FilterEntity> = Repository::new(pool);

    let project = projects
        .create(&sample_project_request("Inbox"))
        .await
        .unwrap();
    let done = tasks
        .create(&sample_task_request("Done task", project.id))
        .await
        .unwrap();
    tasks
        .create(&sample_task_request("Open task", project.id))
        .await
        .unwrap();
    tasks
        .update(
            done.id,
            &UpdateTaskRequest {
                status: Some(EntityStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let saved = filters
        .create(&CreateFilterRequest {
            name: "Completed tasks".to_string(),
            description: None,
            target: FilterTarget::Task,
            rules: vec![status_rule("completed")],
        })
        .await
        .unwrap();

    // Evaluate the persisted rules through the same pipeline as get_multi
    let conditions =
        rules_to_conditions(spec_for_target(saved.target), &saved.rules).unwrap();
    let results = tasks
        .find(&conditions, None, Pagination::default())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, done.id);
    assert_eq!(results[0].status, EntityStatus::Completed);
}

#[tokio::test]
async fn test_filter_update_revalidates_rules_against_new_target() {
    let temp_file = NamedTempFile::new().unwrap();
    let pool = create_test_database(temp_file.path()).await.unwrap();
    let filters: Repository<FilterEntity> = Repository::new(pool);

    // kind only exists on projects
    let saved = filters
        .create(&CreateFilterRequest {
            name: "Areas".to_string(),
            description: None,
            target: FilterTarget::Project,
            rules: vec![FilterRule {
                field: "kind".to_string(),
                operator: FilterOperator::Eq,
                value: serde_json::json!("area"),
            }],
        })
        .await
        .unwrap();

    let retarget = UpdateFilterRequest {
        target: Some(FilterTarget::Task),
        ..Default::default()
    };
    let result = filters.update(saved.id, &retarget).await;
    assert!(matches!(result, Err(TasklyError::Validation { .. })));

    // Replacing the rules along with the target is accepted
    let retarget_with_rules = UpdateFilterRequest {
        target: Some(FilterTarget::Task),
        rules: Some(vec![status_rule("in_progress")]),
        ..Default::default()
    };
    let updated = filters.update(saved.id, &retarget_with_rules).await.unwrap();
    assert_eq!(updated.target, FilterTarget::Task);
    assert_eq!(updated.rules.len(), 1);
}

#[tokio::test]
async fn test_between_rule_filters_a_window() {
    let temp_file = NamedTempFile::new().unwrap();
    let pool = create_test_database(temp_file.path()).await.unwrap();
    let projects: Repository<ProjectEntity> = Repository::new(pool.clone());
    let tasks: Repository<TaskEntity> = Repository::new(pool);

    let project = projects
        .create(&sample_project_request("Scheduled"))
        .await
        .unwrap();

    let mut january = sample_task_request("January", project.id);
    january.deadline_date = Some("2026-01-15T00:00:00Z".parse().unwrap());
    let mut june = sample_task_request("June", project.id);
    june.deadline_date = Some("2026-06-15T00:00:00Z".parse().unwrap());
    tasks.create(&january).await.unwrap();
    tasks.create(&june).await.unwrap();

    let rules = vec![FilterRule {
        field: "deadline_date".to_string(),
        operator: FilterOperator::Between,
        value: serde_json::json!(["2026-01-01T00:00:00Z", "2026-03-01T00:00:00Z"]),
    }];
    let conditions = rules_to_conditions(spec_for_target(FilterTarget::Task), &rules).unwrap();
    let results = tasks
        .find(&conditions, None, Pagination::default())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "January");
}

#[tokio::test]
async fn test_malformed_rule_shapes_are_rejected() {
    let spec = spec_for_target(FilterTarget::Task);

    // between with one bound
    let between = vec![FilterRule {
        field: "deadline_date".to_string(),
        operator: FilterOperator::Between,
        value: serde_json::json!(["2026-01-01T00:00:00Z"]),
    }];
    assert!(rules_to_conditions(spec, &between).is_err());

    // in with an empty list
    let empty_in = vec![FilterRule {
        field: "status".to_string(),
        operator: FilterOperator::In,
        value: serde_json::json!([]),
    }];
    assert!(rules_to_conditions(spec, &empty_in).is_err());

    // like with a non-string value
    let bad_like = vec![FilterRule {
        field: "name".to_string(),
        operator: FilterOperator::Like,
        value: serde_json::json!(42),
    }];
    assert!(rules_to_conditions(spec, &bad_like).is_err());
}
