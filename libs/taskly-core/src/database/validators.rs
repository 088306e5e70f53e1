//! Business-rule validation shared by the entity hooks
//!
//! These checks run before any SQL is issued; referential integrity itself
//! is enforced by the store's foreign keys and surfaces as `Conflict`.

use crate::error::{Result, TasklyError};
use crate::models::ProjectKind;
use chrono::{DateTime, Utc};
use taskly_common::{truncate_string, MAX_NAME_LENGTH};
use uuid::Uuid;

/// Validate an entity name: required, non-blank, bounded length
///
/// # Errors
///
/// Returns a validation error for empty or over-long names
pub fn validate_name(entity: &'static str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TasklyError::validation(format!(
            "{entity} name must not be empty"
        )));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(TasklyError::validation(format!(
            "{entity} name `{}` exceeds {MAX_NAME_LENGTH} characters",
            truncate_string(name, 32)
        )));
    }
    Ok(())
}

/// Validate that a date range is not inverted
///
/// # Errors
///
/// Returns a validation error when the start date is after the deadline
pub fn validate_date_range(
    start_date: Option<&DateTime<Utc>>,
    deadline_date: Option<&DateTime<Utc>>,
) -> Result<()> {
    if let (Some(start), Some(deadline)) = (start_date, deadline_date) {
        if start > deadline {
            return Err(TasklyError::validation(
                "start_date must not be after deadline_date",
            ));
        }
    }
    Ok(())
}

/// Validate that a task belongs to exactly one parent
///
/// # Errors
///
/// Returns a validation error when both or neither of `project_id` and
/// `parent_task_id` are set
pub fn validate_task_parent(
    project_id: Option<&Uuid>,
    parent_task_id: Option<&Uuid>,
) -> Result<()> {
    match (project_id, parent_task_id) {
        (Some(_), Some(_)) => Err(TasklyError::validation(
            "a task cannot have both project_id and parent_task_id",
        )),
        (None, None) => Err(TasklyError::validation(
            "a task requires exactly one of project_id or parent_task_id",
        )),
        _ => Ok(()),
    }
}

/// Validate that areas do not carry scheduling dates
///
/// # Errors
///
/// Returns a validation error when a project of kind `area` has a start or
/// deadline date
pub fn validate_area_dates(
    kind: ProjectKind,
    start_date: Option<&DateTime<Utc>>,
    deadline_date: Option<&DateTime<Utc>>,
) -> Result<()> {
    if kind == ProjectKind::Area && (start_date.is_some() || deadline_date.is_some()) {
        return Err(TasklyError::validation(
            "areas cannot have start_date or deadline_date",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validate_name_rejects_empty() {
        assert!(validate_name("project", "").is_err());
        assert!(validate_name("project", "   ").is_err());
        assert!(validate_name("project", "Renovation").is_ok());
    }

    #[test]
    fn test_validate_name_rejects_over_long() {
        let long_name = "x".repeat(MAX_NAME_LENGTH + 1);
        let err = validate_name("task", &long_name).unwrap_err();
        assert!(err.to_string().contains("exceeds"));

        let max_name = "x".repeat(MAX_NAME_LENGTH);
        assert!(validate_name("task", &max_name).is_ok());
    }

    #[test]
    fn test_validate_name_counts_characters_not_bytes() {
        // 100 two-byte characters is exactly at the limit
        let max_name = "é".repeat(MAX_NAME_LENGTH);
        assert!(validate_name("project", &max_name).is_ok());

        // One over the limit reports the error instead of panicking while
        // truncating the name for the message
        let long_name = "é".repeat(MAX_NAME_LENGTH + 1);
        let err = validate_name("project", &long_name).unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_validate_date_range() {
        let early = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();

        assert!(validate_date_range(Some(&early), Some(&late)).is_ok());
        assert!(validate_date_range(Some(&late), Some(&early)).is_err());
        assert!(validate_date_range(Some(&early), None).is_ok());
        assert!(validate_date_range(None, None).is_ok());
    }

    #[test]
    fn test_validate_task_parent() {
        let project = Uuid::new_v4();
        let parent = Uuid::new_v4();

        assert!(validate_task_parent(Some(&project), None).is_ok());
        assert!(validate_task_parent(None, Some(&parent)).is_ok());
        assert!(validate_task_parent(Some(&project), Some(&parent)).is_err());
        assert!(validate_task_parent(None, None).is_err());
    }

    #[test]
    fn test_validate_area_dates() {
        let date = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

        assert!(validate_area_dates(ProjectKind::Project, Some(&date), None).is_ok());
        assert!(validate_area_dates(ProjectKind::Area, None, None).is_ok());
        assert!(validate_area_dates(ProjectKind::Area, Some(&date), None).is_err());
        assert!(validate_area_dates(ProjectKind::Area, None, Some(&date)).is_err());
    }
}
