//! Data models for Taskly entities

use crate::filters::FilterOperator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskly_common::{DEFAULT_ITEMS_PER_PAGE, DEFAULT_PAGE};
use uuid::Uuid;

/// Lifecycle status shared by projects and tasks
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl EntityStatus {
    /// Stable string form used in storage and query parameters
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Parse the storage string form
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Whether a project is a concrete project or a long-lived area
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    #[default]
    Project,
    Area,
}

impl ProjectKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Area => "area",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "project" => Some(Self::Project),
            "area" => Some(Self::Area),
            _ => None,
        }
    }
}

/// Entity collection a saved filter applies to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilterTarget {
    Project,
    Task,
}

impl FilterTarget {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Task => "task",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "project" => Some(Self::Project),
            "task" => Some(Self::Task),
            _ => None,
        }
    }
}

/// A project or area, optionally nested under a parent project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: EntityStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub deadline_date: Option<DateTime<Utc>>,
    pub parent_project_id: Option<Uuid>,
    pub kind: ProjectKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task, attached to exactly one of a project or a parent task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: EntityStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub deadline_date: Option<DateTime<Utc>>,
    pub project_id: Option<Uuid>,
    pub parent_task_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One declarative predicate of a saved filter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterRule {
    pub field: String,
    pub operator: FilterOperator,
    pub value: serde_json::Value,
}

/// A persisted, named set of filter rules over a target entity collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedFilter {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub target: FilterTarget,
    pub rules: Vec<FilterRule>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: EntityStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub deadline_date: Option<DateTime<Utc>>,
    pub parent_project_id: Option<Uuid>,
    #[serde(default)]
    pub kind: ProjectKind,
}

/// Partial update of an existing project; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<EntityStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub deadline_date: Option<DateTime<Utc>>,
    pub parent_project_id: Option<Uuid>,
    pub kind: Option<ProjectKind>,
}

/// Request to create a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: EntityStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub deadline_date: Option<DateTime<Utc>>,
    pub project_id: Option<Uuid>,
    pub parent_task_id: Option<Uuid>,
}

/// Partial update of an existing task; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<EntityStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub deadline_date: Option<DateTime<Utc>>,
    pub project_id: Option<Uuid>,
    pub parent_task_id: Option<Uuid>,
}

/// Request to create a new saved filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFilterRequest {
    pub name: String,
    pub description: Option<String>,
    pub target: FilterTarget,
    #[serde(default)]
    pub rules: Vec<FilterRule>,
}

/// Partial update of an existing saved filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFilterRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target: Option<FilterTarget>,
    pub rules: Option<Vec<FilterRule>>,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_items_per_page() -> u32 {
    DEFAULT_ITEMS_PER_PAGE
}

/// Query parameters for listing projects
///
/// `ids` is a comma-separated list of UUIDs; `order_by` is a comma-separated
/// list of allow-listed field names, with a leading `-` for descending order.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectFilterParams {
    pub id: Option<Uuid>,
    pub ids: Option<String>,
    pub name: Option<String>,
    pub status: Option<EntityStatus>,
    pub kind: Option<ProjectKind>,
    pub parent_project_id: Option<Uuid>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(rename = "itemsPerPage", default = "default_items_per_page")]
    pub items_per_page: u32,
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
}

/// Query parameters for listing tasks
#[derive(Debug, Clone, Deserialize)]
pub struct TaskFilterParams {
    pub id: Option<Uuid>,
    pub ids: Option<String>,
    pub name: Option<String>,
    pub status: Option<EntityStatus>,
    pub project_id: Option<Uuid>,
    pub parent_task_id: Option<Uuid>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(rename = "itemsPerPage", default = "default_items_per_page")]
    pub items_per_page: u32,
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
}

/// Query parameters for listing saved filters
#[derive(Debug, Clone, Deserialize)]
pub struct SavedFilterParams {
    pub id: Option<Uuid>,
    pub ids: Option<String>,
    pub name: Option<String>,
    pub target: Option<FilterTarget>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(rename = "itemsPerPage", default = "default_items_per_page")]
    pub items_per_page: u32,
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
}

// Derived `Default` would zero the pagination fields; the hand-written impls
// keep `Params::default()` valid for programmatic callers, matching the
// serde field defaults.
impl Default for ProjectFilterParams {
    fn default() -> Self {
        Self {
            id: None,
            ids: None,
            name: None,
            status: None,
            kind: None,
            parent_project_id: None,
            page: default_page(),
            items_per_page: default_items_per_page(),
            order_by: None,
        }
    }
}

impl Default for TaskFilterParams {
    fn default() -> Self {
        Self {
            id: None,
            ids: None,
            name: None,
            status: None,
            project_id: None,
            parent_task_id: None,
            page: default_page(),
            items_per_page: default_items_per_page(),
            order_by: None,
        }
    }
}

impl Default for SavedFilterParams {
    fn default() -> Self {
        Self {
            id: None,
            ids: None,
            name: None,
            target: None,
            page: default_page(),
            items_per_page: default_items_per_page(),
            order_by: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_status_round_trip() {
        for status in [
            EntityStatus::NotStarted,
            EntityStatus::InProgress,
            EntityStatus::Completed,
        ] {
            assert_eq!(EntityStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(EntityStatus::parse("archived"), None);
    }

    #[test]
    fn test_entity_status_serde_names() {
        let json = serde_json::to_string(&EntityStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let parsed: EntityStatus = serde_json::from_str("\"not_started\"").unwrap();
        assert_eq!(parsed, EntityStatus::NotStarted);
    }

    #[test]
    fn test_project_kind_defaults_to_project() {
        assert_eq!(ProjectKind::default(), ProjectKind::Project);
        assert_eq!(ProjectKind::parse("area"), Some(ProjectKind::Area));
        assert_eq!(ProjectKind::parse("folder"), None);
    }

    #[test]
    fn test_filter_target_round_trip() {
        assert_eq!(FilterTarget::parse("project"), Some(FilterTarget::Project));
        assert_eq!(FilterTarget::parse("task"), Some(FilterTarget::Task));
        assert_eq!(FilterTarget::parse(""), None);
    }

    #[test]
    fn test_create_project_request_defaults() {
        let request: CreateProjectRequest =
            serde_json::from_str(r#"{"name": "Renovation"}"#).unwrap();
        assert_eq!(request.name, "Renovation");
        assert_eq!(request.status, EntityStatus::NotStarted);
        assert_eq!(request.kind, ProjectKind::Project);
        assert!(request.description.is_none());
    }

    #[test]
    fn test_update_task_request_partial() {
        let request: UpdateTaskRequest =
            serde_json::from_str(r#"{"status": "completed"}"#).unwrap();
        assert_eq!(request.status, Some(EntityStatus::Completed));
        assert!(request.name.is_none());
        assert!(request.project_id.is_none());
    }

    #[test]
    fn test_filter_rule_serde() {
        let rule: FilterRule = serde_json::from_str(
            r#"{"field": "status", "operator": "eq", "value": "completed"}"#,
        )
        .unwrap();
        assert_eq!(rule.field, "status");
        assert_eq!(rule.operator, FilterOperator::Eq);
        assert_eq!(rule.value, serde_json::json!("completed"));
    }

    #[test]
    fn test_filter_params_defaults() {
        let params: ProjectFilterParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.items_per_page, 50);
        assert!(params.order_by.is_none());
    }

    #[test]
    fn test_filter_params_default_matches_serde_defaults() {
        // `Default::default()` must produce a valid pagination window, the
        // same one an empty query string deserializes to
        assert_eq!(ProjectFilterParams::default().page, DEFAULT_PAGE);
        assert_eq!(
            ProjectFilterParams::default().items_per_page,
            DEFAULT_ITEMS_PER_PAGE
        );
        assert_eq!(TaskFilterParams::default().page, DEFAULT_PAGE);
        assert_eq!(
            TaskFilterParams::default().items_per_page,
            DEFAULT_ITEMS_PER_PAGE
        );
        assert_eq!(SavedFilterParams::default().page, DEFAULT_PAGE);
        assert_eq!(
            SavedFilterParams::default().items_per_page,
            DEFAULT_ITEMS_PER_PAGE
        );
    }

    #[test]
    fn test_filter_params_renamed_fields() {
        let params: TaskFilterParams =
            serde_json::from_str(r#"{"itemsPerPage": 10, "orderBy": "-created_at"}"#).unwrap();
        assert_eq!(params.items_per_page, 10);
        assert_eq!(params.order_by.as_deref(), Some("-created_at"));
    }
}
