//! Per-entity `EntitySpec` implementations
//!
//! Each entity declares its filterable fields and ordering allow-list as a
//! static table; the generic repository drives everything else. Business
//! rules live in the `validate` hook overrides.

use crate::database::mappers::{map_filter_row, map_project_row, map_task_row};
use crate::database::repository::{CrudAction, EntitySpec, HookRequest};
use crate::database::validators::{
    validate_area_dates, validate_date_range, validate_name, validate_task_parent,
};
use crate::error::Result;
use crate::filters::{
    escape_like, parse_id_list, rules_to_conditions, Condition, FieldKind, FilterField,
    FilterOperator, FilterSpec, FilterValue, OrderField, Ordering, PageParams, Pagination,
};
use crate::models::{
    CreateFilterRequest, CreateProjectRequest, CreateTaskRequest, FilterTarget, Project,
    ProjectFilterParams, SavedFilter, SavedFilterParams, Task, TaskFilterParams,
    UpdateFilterRequest, UpdateProjectRequest, UpdateTaskRequest,
};
use sqlx::sqlite::SqliteRow;
use tracing::debug;
use uuid::Uuid;

const ID_OPS: &[FilterOperator] = &[FilterOperator::Eq, FilterOperator::In, FilterOperator::NotIn];
const TEXT_OPS: &[FilterOperator] = &[
    FilterOperator::Eq,
    FilterOperator::Ne,
    FilterOperator::Like,
    FilterOperator::NotLike,
];
const ENUM_OPS: &[FilterOperator] = &[
    FilterOperator::Eq,
    FilterOperator::Ne,
    FilterOperator::In,
    FilterOperator::NotIn,
];
const DATE_OPS: &[FilterOperator] = &[
    FilterOperator::Eq,
    FilterOperator::Ne,
    FilterOperator::Lt,
    FilterOperator::Le,
    FilterOperator::Gt,
    FilterOperator::Ge,
    FilterOperator::Between,
];

static PROJECT_FILTER_SPEC: FilterSpec = FilterSpec {
    entity: "project",
    fields: &[
        FilterField {
            name: "id",
            column: "id",
            kind: FieldKind::Uuid,
            operators: ID_OPS,
        },
        FilterField {
            name: "name",
            column: "name",
            kind: FieldKind::Text,
            operators: TEXT_OPS,
        },
        FilterField {
            name: "status",
            column: "status",
            kind: FieldKind::Text,
            operators: ENUM_OPS,
        },
        FilterField {
            name: "kind",
            column: "kind",
            kind: FieldKind::Text,
            operators: &[FilterOperator::Eq, FilterOperator::Ne],
        },
        FilterField {
            name: "parent_project_id",
            column: "parent_project_id",
            kind: FieldKind::Uuid,
            operators: ID_OPS,
        },
        FilterField {
            name: "start_date",
            column: "start_date",
            kind: FieldKind::Timestamp,
            operators: DATE_OPS,
        },
        FilterField {
            name: "deadline_date",
            column: "deadline_date",
            kind: FieldKind::Timestamp,
            operators: DATE_OPS,
        },
        FilterField {
            name: "created_at",
            column: "created_at",
            kind: FieldKind::Timestamp,
            operators: DATE_OPS,
        },
        FilterField {
            name: "updated_at",
            column: "updated_at",
            kind: FieldKind::Timestamp,
            operators: DATE_OPS,
        },
    ],
};

static PROJECT_ORDERING: Ordering = Ordering {
    entity: "project",
    fields: &[
        OrderField {
            name: "name",
            column: "name",
        },
        OrderField {
            name: "status",
            column: "status",
        },
        OrderField {
            name: "start_date",
            column: "start_date",
        },
        OrderField {
            name: "deadline_date",
            column: "deadline_date",
        },
        OrderField {
            name: "created_at",
            column: "created_at",
        },
        OrderField {
            name: "updated_at",
            column: "updated_at",
        },
    ],
    default: "created_at",
};

static TASK_FILTER_SPEC: FilterSpec = FilterSpec {
    entity: "task",
    fields: &[
        FilterField {
            name: "id",
            column: "id",
            kind: FieldKind::Uuid,
            operators: ID_OPS,
        },
        FilterField {
            name: "name",
            column: "name",
            kind: FieldKind::Text,
            operators: TEXT_OPS,
        },
        FilterField {
            name: "status",
            column: "status",
            kind: FieldKind::Text,
            operators: ENUM_OPS,
        },
        FilterField {
            name: "project_id",
            column: "project_id",
            kind: FieldKind::Uuid,
            operators: ID_OPS,
        },
        FilterField {
            name: "parent_task_id",
            column: "parent_task_id",
            kind: FieldKind::Uuid,
            operators: ID_OPS,
        },
        FilterField {
            name: "start_date",
            column: "start_date",
            kind: FieldKind::Timestamp,
            operators: DATE_OPS,
        },
        FilterField {
            name: "deadline_date",
            column: "deadline_date",
            kind: FieldKind::Timestamp,
            operators: DATE_OPS,
        },
        FilterField {
            name: "created_at",
            column: "created_at",
            kind: FieldKind::Timestamp,
            operators: DATE_OPS,
        },
        FilterField {
            name: "updated_at",
            column: "updated_at",
            kind: FieldKind::Timestamp,
            operators: DATE_OPS,
        },
    ],
};

static TASK_ORDERING: Ordering = Ordering {
    entity: "task",
    fields: &[
        OrderField {
            name: "name",
            column: "name",
        },
        OrderField {
            name: "status",
            column: "status",
        },
        OrderField {
            name: "start_date",
            column: "start_date",
        },
        OrderField {
            name: "deadline_date",
            column: "deadline_date",
        },
        OrderField {
            name: "created_at",
            column: "created_at",
        },
        OrderField {
            name: "updated_at",
            column: "updated_at",
        },
    ],
    default: "created_at",
};

static FILTER_FILTER_SPEC: FilterSpec = FilterSpec {
    entity: "filter",
    fields: &[
        FilterField {
            name: "id",
            column: "id",
            kind: FieldKind::Uuid,
            operators: ID_OPS,
        },
        FilterField {
            name: "name",
            column: "name",
            kind: FieldKind::Text,
            operators: TEXT_OPS,
        },
        FilterField {
            name: "target",
            column: "target",
            kind: FieldKind::Text,
            operators: &[FilterOperator::Eq, FilterOperator::Ne],
        },
        FilterField {
            name: "created_at",
            column: "created_at",
            kind: FieldKind::Timestamp,
            operators: DATE_OPS,
        },
        FilterField {
            name: "updated_at",
            column: "updated_at",
            kind: FieldKind::Timestamp,
            operators: DATE_OPS,
        },
    ],
};

static FILTER_ORDERING: Ordering = Ordering {
    entity: "filter",
    fields: &[
        OrderField {
            name: "name",
            column: "name",
        },
        OrderField {
            name: "target",
            column: "target",
        },
        OrderField {
            name: "created_at",
            column: "created_at",
        },
        OrderField {
            name: "updated_at",
            column: "updated_at",
        },
    ],
    default: "created_at",
};

/// Filter spec of the entity collection a saved filter targets
#[must_use]
pub fn spec_for_target(target: FilterTarget) -> &'static FilterSpec {
    match target {
        FilterTarget::Project => &PROJECT_FILTER_SPEC,
        FilterTarget::Task => &TASK_FILTER_SPEC,
    }
}

/// Conditions shared by every entity's list parameters
fn common_conditions(
    id: Option<Uuid>,
    ids: Option<&str>,
    name: Option<&str>,
) -> Result<Vec<Condition>> {
    let mut conditions = Vec::new();
    if let Some(id) = id {
        conditions.push(Condition::new(
            "id",
            FilterOperator::Eq,
            FilterValue::Uuid(id),
        ));
    }
    if let Some(raw) = ids {
        let parsed = parse_id_list(raw)?;
        conditions.push(Condition::new(
            "id",
            FilterOperator::In,
            FilterValue::List(parsed.into_iter().map(FilterValue::Uuid).collect()),
        ));
    }
    if let Some(name) = name {
        conditions.push(Condition::new(
            "name",
            FilterOperator::Like,
            FilterValue::Text(format!("%{}%", escape_like(name))),
        ));
    }
    Ok(conditions)
}

impl PageParams for ProjectFilterParams {
    fn pagination(&self) -> Result<Pagination> {
        Pagination::new(self.page, self.items_per_page)
    }

    fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }
}

impl PageParams for TaskFilterParams {
    fn pagination(&self) -> Result<Pagination> {
        Pagination::new(self.page, self.items_per_page)
    }

    fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }
}

impl PageParams for SavedFilterParams {
    fn pagination(&self) -> Result<Pagination> {
        Pagination::new(self.page, self.items_per_page)
    }

    fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }
}

/// Projects and areas
#[derive(Debug, Clone, Copy)]
pub struct ProjectEntity;

impl EntitySpec for ProjectEntity {
    type Model = Project;
    type Create = CreateProjectRequest;
    type Update = UpdateProjectRequest;
    type Params = ProjectFilterParams;

    const ENTITY: &'static str = "project";
    const TABLE: &'static str = "projects";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "description",
        "status",
        "start_date",
        "deadline_date",
        "parent_project_id",
        "kind",
    ];

    fn filter_spec() -> &'static FilterSpec {
        &PROJECT_FILTER_SPEC
    }

    fn ordering() -> &'static Ordering {
        &PROJECT_ORDERING
    }

    fn map_row(row: &SqliteRow) -> Result<Project> {
        map_project_row(row)
    }

    fn conditions(params: &ProjectFilterParams) -> Result<Vec<Condition>> {
        let mut conditions =
            common_conditions(params.id, params.ids.as_deref(), params.name.as_deref())?;
        if let Some(status) = params.status {
            conditions.push(Condition::new(
                "status",
                FilterOperator::Eq,
                FilterValue::Text(status.as_str().to_string()),
            ));
        }
        if let Some(kind) = params.kind {
            conditions.push(Condition::new(
                "kind",
                FilterOperator::Eq,
                FilterValue::Text(kind.as_str().to_string()),
            ));
        }
        if let Some(parent) = params.parent_project_id {
            conditions.push(Condition::new(
                "parent_project_id",
                FilterOperator::Eq,
                FilterValue::Uuid(parent),
            ));
        }
        Ok(conditions)
    }

    fn insert_values(data: &CreateProjectRequest) -> Result<Vec<(&'static str, FilterValue)>> {
        let mut values = vec![
            ("name", FilterValue::Text(data.name.clone())),
            ("status", FilterValue::Text(data.status.as_str().to_string())),
            ("kind", FilterValue::Text(data.kind.as_str().to_string())),
        ];
        if let Some(description) = &data.description {
            values.push(("description", FilterValue::Text(description.clone())));
        }
        if let Some(start) = data.start_date {
            values.push(("start_date", FilterValue::Timestamp(start)));
        }
        if let Some(deadline) = data.deadline_date {
            values.push(("deadline_date", FilterValue::Timestamp(deadline)));
        }
        if let Some(parent) = data.parent_project_id {
            values.push(("parent_project_id", FilterValue::Uuid(parent)));
        }
        Ok(values)
    }

    fn update_values(data: &UpdateProjectRequest) -> Result<Vec<(&'static str, FilterValue)>> {
        let mut values = Vec::new();
        if let Some(name) = &data.name {
            values.push(("name", FilterValue::Text(name.clone())));
        }
        if let Some(description) = &data.description {
            values.push(("description", FilterValue::Text(description.clone())));
        }
        if let Some(status) = data.status {
            values.push(("status", FilterValue::Text(status.as_str().to_string())));
        }
        if let Some(start) = data.start_date {
            values.push(("start_date", FilterValue::Timestamp(start)));
        }
        if let Some(deadline) = data.deadline_date {
            values.push(("deadline_date", FilterValue::Timestamp(deadline)));
        }
        if let Some(parent) = data.parent_project_id {
            values.push(("parent_project_id", FilterValue::Uuid(parent)));
        }
        if let Some(kind) = data.kind {
            values.push(("kind", FilterValue::Text(kind.as_str().to_string())));
        }
        Ok(values)
    }

    fn validate(action: CrudAction, request: &HookRequest<'_, Self>) -> Result<()> {
        match request {
            HookRequest::Create { data } => {
                validate_name(Self::ENTITY, &data.name)?;
                validate_date_range(data.start_date.as_ref(), data.deadline_date.as_ref())?;
                validate_area_dates(
                    data.kind,
                    data.start_date.as_ref(),
                    data.deadline_date.as_ref(),
                )
            }
            HookRequest::Update { data, current, .. } => {
                if let Some(name) = &data.name {
                    validate_name(Self::ENTITY, name)?;
                }
                // Rules apply to the merged state, not just the patch
                let start = data.start_date.or(current.start_date);
                let deadline = data.deadline_date.or(current.deadline_date);
                let kind = data.kind.unwrap_or(current.kind);
                validate_date_range(start.as_ref(), deadline.as_ref())?;
                validate_area_dates(kind, start.as_ref(), deadline.as_ref())
            }
            _ => {
                let _ = action;
                Ok(())
            }
        }
    }

    fn post_processing(action: CrudAction, model: Option<&Project>) {
        if let Some(project) = model {
            debug!(
                action = action.as_str(),
                id = %project.id,
                "project {} processed", action.as_str()
            );
        }
    }
}

/// Tasks, nested under a project or another task
#[derive(Debug, Clone, Copy)]
pub struct TaskEntity;

impl EntitySpec for TaskEntity {
    type Model = Task;
    type Create = CreateTaskRequest;
    type Update = UpdateTaskRequest;
    type Params = TaskFilterParams;

    const ENTITY: &'static str = "task";
    const TABLE: &'static str = "tasks";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "description",
        "status",
        "start_date",
        "deadline_date",
        "project_id",
        "parent_task_id",
    ];

    fn filter_spec() -> &'static FilterSpec {
        &TASK_FILTER_SPEC
    }

    fn ordering() -> &'static Ordering {
        &TASK_ORDERING
    }

    fn map_row(row: &SqliteRow) -> Result<Task> {
        map_task_row(row)
    }

    fn conditions(params: &TaskFilterParams) -> Result<Vec<Condition>> {
        let mut conditions =
            common_conditions(params.id, params.ids.as_deref(), params.name.as_deref())?;
        if let Some(status) = params.status {
            conditions.push(Condition::new(
                "status",
                FilterOperator::Eq,
                FilterValue::Text(status.as_str().to_string()),
            ));
        }
        if let Some(project_id) = params.project_id {
            conditions.push(Condition::new(
                "project_id",
                FilterOperator::Eq,
                FilterValue::Uuid(project_id),
            ));
        }
        if let Some(parent) = params.parent_task_id {
            conditions.push(Condition::new(
                "parent_task_id",
                FilterOperator::Eq,
                FilterValue::Uuid(parent),
            ));
        }
        Ok(conditions)
    }

    fn insert_values(data: &CreateTaskRequest) -> Result<Vec<(&'static str, FilterValue)>> {
        let mut values = vec![
            ("name", FilterValue::Text(data.name.clone())),
            ("status", FilterValue::Text(data.status.as_str().to_string())),
        ];
        if let Some(description) = &data.description {
            values.push(("description", FilterValue::Text(description.clone())));
        }
        if let Some(start) = data.start_date {
            values.push(("start_date", FilterValue::Timestamp(start)));
        }
        if let Some(deadline) = data.deadline_date {
            values.push(("deadline_date", FilterValue::Timestamp(deadline)));
        }
        if let Some(project_id) = data.project_id {
            values.push(("project_id", FilterValue::Uuid(project_id)));
        }
        if let Some(parent) = data.parent_task_id {
            values.push(("parent_task_id", FilterValue::Uuid(parent)));
        }
        Ok(values)
    }

    fn update_values(data: &UpdateTaskRequest) -> Result<Vec<(&'static str, FilterValue)>> {
        let mut values = Vec::new();
        if let Some(name) = &data.name {
            values.push(("name", FilterValue::Text(name.clone())));
        }
        if let Some(description) = &data.description {
            values.push(("description", FilterValue::Text(description.clone())));
        }
        if let Some(status) = data.status {
            values.push(("status", FilterValue::Text(status.as_str().to_string())));
        }
        if let Some(start) = data.start_date {
            values.push(("start_date", FilterValue::Timestamp(start)));
        }
        if let Some(deadline) = data.deadline_date {
            values.push(("deadline_date", FilterValue::Timestamp(deadline)));
        }
        if let Some(project_id) = data.project_id {
            values.push(("project_id", FilterValue::Uuid(project_id)));
        }
        if let Some(parent) = data.parent_task_id {
            values.push(("parent_task_id", FilterValue::Uuid(parent)));
        }
        Ok(values)
    }

    fn validate(action: CrudAction, request: &HookRequest<'_, Self>) -> Result<()> {
        match request {
            HookRequest::Create { data } => {
                validate_name(Self::ENTITY, &data.name)?;
                validate_date_range(data.start_date.as_ref(), data.deadline_date.as_ref())?;
                validate_task_parent(data.project_id.as_ref(), data.parent_task_id.as_ref())
            }
            HookRequest::Update { data, current, .. } => {
                if let Some(name) = &data.name {
                    validate_name(Self::ENTITY, name)?;
                }
                let start = data.start_date.or(current.start_date);
                let deadline = data.deadline_date.or(current.deadline_date);
                validate_date_range(start.as_ref(), deadline.as_ref())?;
                // Moving a task between parents requires clearing the other
                // side, so a patch that would leave both set is rejected
                let project_id = data.project_id.or(current.project_id);
                let parent_task_id = data.parent_task_id.or(current.parent_task_id);
                validate_task_parent(project_id.as_ref(), parent_task_id.as_ref())
            }
            _ => {
                let _ = action;
                Ok(())
            }
        }
    }

    fn post_processing(action: CrudAction, model: Option<&Task>) {
        if let Some(task) = model {
            debug!(
                action = action.as_str(),
                id = %task.id,
                "task {} processed", action.as_str()
            );
        }
    }
}

/// Saved filters over projects or tasks
#[derive(Debug, Clone, Copy)]
pub struct FilterEntity;

impl EntitySpec for FilterEntity {
    type Model = SavedFilter;
    type Create = CreateFilterRequest;
    type Update = UpdateFilterRequest;
    type Params = SavedFilterParams;

    const ENTITY: &'static str = "filter";
    const TABLE: &'static str = "filters";
    const COLUMNS: &'static [&'static str] = &["name", "description", "target", "rules"];

    fn filter_spec() -> &'static FilterSpec {
        &FILTER_FILTER_SPEC
    }

    fn ordering() -> &'static Ordering {
        &FILTER_ORDERING
    }

    fn map_row(row: &SqliteRow) -> Result<SavedFilter> {
        map_filter_row(row)
    }

    fn conditions(params: &SavedFilterParams) -> Result<Vec<Condition>> {
        let mut conditions =
            common_conditions(params.id, params.ids.as_deref(), params.name.as_deref())?;
        if let Some(target) = params.target {
            conditions.push(Condition::new(
                "target",
                FilterOperator::Eq,
                FilterValue::Text(target.as_str().to_string()),
            ));
        }
        Ok(conditions)
    }

    fn insert_values(data: &CreateFilterRequest) -> Result<Vec<(&'static str, FilterValue)>> {
        let rules = serde_json::to_string(&data.rules)?;
        let mut values = vec![
            ("name", FilterValue::Text(data.name.clone())),
            ("target", FilterValue::Text(data.target.as_str().to_string())),
            ("rules", FilterValue::Text(rules)),
        ];
        if let Some(description) = &data.description {
            values.push(("description", FilterValue::Text(description.clone())));
        }
        Ok(values)
    }

    fn update_values(data: &UpdateFilterRequest) -> Result<Vec<(&'static str, FilterValue)>> {
        let mut values = Vec::new();
        if let Some(name) = &data.name {
            values.push(("name", FilterValue::Text(name.clone())));
        }
        if let Some(description) = &data.description {
            values.push(("description", FilterValue::Text(description.clone())));
        }
        if let Some(target) = data.target {
            values.push(("target", FilterValue::Text(target.as_str().to_string())));
        }
        if let Some(rules) = &data.rules {
            values.push(("rules", FilterValue::Text(serde_json::to_string(rules)?)));
        }
        Ok(values)
    }

    fn validate(action: CrudAction, request: &HookRequest<'_, Self>) -> Result<()> {
        match request {
            HookRequest::Create { data } => {
                validate_name(Self::ENTITY, &data.name)?;
                rules_to_conditions(spec_for_target(data.target), &data.rules).map(|_| ())
            }
            HookRequest::Update { data, current, .. } => {
                if let Some(name) = &data.name {
                    validate_name(Self::ENTITY, name)?;
                }
                // Rules must stay valid for the (possibly changed) target
                let target = data.target.unwrap_or(current.target);
                let rules = data.rules.as_ref().unwrap_or(&current.rules);
                rules_to_conditions(spec_for_target(target), rules).map(|_| ())
            }
            _ => {
                let _ = action;
                Ok(())
            }
        }
    }

    fn post_processing(action: CrudAction, model: Option<&SavedFilter>) {
        if let Some(filter) = model {
            debug!(
                action = action.as_str(),
                id = %filter.id,
                "filter {} processed", action.as_str()
            );
        }
    }
}
