//! Row mapping utilities for converting database rows to domain models
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, UTC) so that lexicographic comparison in SQL matches
//! chronological order.

use crate::{
    error::{Result, TasklyError},
    models::{EntityStatus, FilterRule, FilterTarget, Project, ProjectKind, SavedFilter, Task},
};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Format a timestamp in the canonical storage form
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a timestamp from its storage form
///
/// # Errors
///
/// Returns a database error when the stored value is not valid RFC 3339
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TasklyError::database(format!("Invalid stored timestamp `{raw}`: {e}")))
}

fn parse_optional_timestamp(raw: Option<String>) -> Result<Option<DateTime<Utc>>> {
    raw.as_deref().map(parse_timestamp).transpose()
}

fn parse_row_uuid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| TasklyError::database(format!("Invalid stored UUID `{raw}`: {e}")))
}

fn parse_optional_uuid(raw: Option<String>) -> Result<Option<Uuid>> {
    raw.as_deref().map(parse_row_uuid).transpose()
}

fn parse_status(raw: &str) -> Result<EntityStatus> {
    EntityStatus::parse(raw)
        .ok_or_else(|| TasklyError::database(format!("Invalid stored status `{raw}`")))
}

/// Map a database row to a `Project`
///
/// # Errors
///
/// Returns an error when a stored value cannot be converted
pub fn map_project_row(row: &SqliteRow) -> Result<Project> {
    let kind_raw: String = row.get("kind");
    let kind = ProjectKind::parse(&kind_raw)
        .ok_or_else(|| TasklyError::database(format!("Invalid stored kind `{kind_raw}`")))?;

    Ok(Project {
        id: parse_row_uuid(&row.get::<String, _>("id"))?,
        name: row.get("name"),
        description: row.get("description"),
        status: parse_status(&row.get::<String, _>("status"))?,
        start_date: parse_optional_timestamp(row.get("start_date"))?,
        deadline_date: parse_optional_timestamp(row.get("deadline_date"))?,
        parent_project_id: parse_optional_uuid(row.get("parent_project_id"))?,
        kind,
        created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
        updated_at: parse_timestamp(&row.get::<String, _>("updated_at"))?,
    })
}

/// Map a database row to a `Task`
///
/// # Errors
///
/// Returns an error when a stored value cannot be converted
pub fn map_task_row(row: &SqliteRow) -> Result<Task> {
    Ok(Task {
        id: parse_row_uuid(&row.get::<String, _>("id"))?,
        name: row.get("name"),
        description: row.get("description"),
        status: parse_status(&row.get::<String, _>("status"))?,
        start_date: parse_optional_timestamp(row.get("start_date"))?,
        deadline_date: parse_optional_timestamp(row.get("deadline_date"))?,
        project_id: parse_optional_uuid(row.get("project_id"))?,
        parent_task_id: parse_optional_uuid(row.get("parent_task_id"))?,
        created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
        updated_at: parse_timestamp(&row.get::<String, _>("updated_at"))?,
    })
}

/// Map a database row to a `SavedFilter`
///
/// # Errors
///
/// Returns an error when a stored value cannot be converted, including
/// rules that no longer deserialize
pub fn map_filter_row(row: &SqliteRow) -> Result<SavedFilter> {
    let target_raw: String = row.get("target");
    let target = FilterTarget::parse(&target_raw)
        .ok_or_else(|| TasklyError::database(format!("Invalid stored target `{target_raw}`")))?;

    let rules_raw: String = row.get("rules");
    let rules: Vec<FilterRule> = serde_json::from_str(&rules_raw)?;

    Ok(SavedFilter {
        id: parse_row_uuid(&row.get::<String, _>("id"))?,
        name: row.get("name"),
        description: row.get("description"),
        target,
        rules,
        created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
        updated_at: parse_timestamp(&row.get::<String, _>("updated_at"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trip() {
        let now = Utc::now();
        let formatted = format_timestamp(&now);
        let parsed = parse_timestamp(&formatted).unwrap();
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
    }

    #[test]
    fn test_timestamp_fixed_width_sorts_lexicographically() {
        let early = parse_timestamp("2026-01-02T03:04:05.000001Z").unwrap();
        let late = parse_timestamp("2026-01-02T03:04:05.100000Z").unwrap();
        let a = format_timestamp(&early);
        let b = format_timestamp(&late);
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(err.to_string().contains("Invalid stored timestamp"));
    }

    #[test]
    fn test_parse_optional_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(
            parse_optional_uuid(Some(id.to_string())).unwrap(),
            Some(id)
        );
        assert_eq!(parse_optional_uuid(None).unwrap(), None);
        assert!(parse_optional_uuid(Some("bogus".to_string())).is_err());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("completed").unwrap(), EntityStatus::Completed);
        assert!(parse_status("on_hold").is_err());
    }
}
