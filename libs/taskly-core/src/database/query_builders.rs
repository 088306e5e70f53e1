//! SQL query builder utilities for type-safe statement construction
//!
//! Builders collect `(column, value)` pairs and emit SQL with positional
//! placeholders; values are bound through `bind_value`, never interpolated.

use crate::database::mappers::format_timestamp;
use crate::filters::FilterValue;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};

/// Bind one scalar `FilterValue` to a query
///
/// Nested values (`List`, `Range`) must be flattened with
/// [`FilterValue::flatten_into`] before binding.
#[must_use]
pub fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &FilterValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        FilterValue::Text(s) => query.bind(s.clone()),
        FilterValue::Integer(i) => query.bind(*i),
        FilterValue::Real(r) => query.bind(*r),
        FilterValue::Timestamp(ts) => query.bind(format_timestamp(ts)),
        FilterValue::Uuid(id) => query.bind(id.to_string()),
        FilterValue::List(_) | FilterValue::Range(_) => {
            debug_assert!(false, "nested FilterValue must be flattened before binding");
            query
        }
    }
}

/// Builder for INSERT statements
#[derive(Debug, Clone, Default)]
pub struct InsertBuilder {
    table: &'static str,
    columns: Vec<&'static str>,
    values: Vec<FilterValue>,
}

impl InsertBuilder {
    #[must_use]
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Add a column and its value
    #[must_use]
    pub fn column(mut self, name: &'static str, value: FilterValue) -> Self {
        self.columns.push(name);
        self.values.push(value);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Values in bind order
    #[must_use]
    pub fn values(&self) -> &[FilterValue] {
        &self.values
    }

    /// Build the complete INSERT query string
    #[must_use]
    pub fn build_query_string(&self) -> String {
        let placeholders = vec!["?"; self.columns.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.columns.join(", "),
            placeholders
        )
    }
}

/// Builder for dynamic UPDATE statements
///
/// Always bumps `updated_at` and filters by `id`; bind order is the SET
/// values in insertion order, then the new `updated_at`, then the row id.
#[derive(Debug, Clone, Default)]
pub struct UpdateBuilder {
    table: &'static str,
    columns: Vec<&'static str>,
    values: Vec<FilterValue>,
}

impl UpdateBuilder {
    #[must_use]
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Add a column to the SET list
    #[must_use]
    pub fn set(mut self, name: &'static str, value: FilterValue) -> Self {
        self.columns.push(name);
        self.values.push(value);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Column names in the SET list (for drift checks and logging)
    #[must_use]
    pub fn fields(&self) -> &[&'static str] {
        &self.columns
    }

    /// Values in bind order, not including `updated_at` and the row id
    #[must_use]
    pub fn values(&self) -> &[FilterValue] {
        &self.values
    }

    /// Build the complete UPDATE query string
    ///
    /// With no fields set, still bumps the modification timestamp.
    #[must_use]
    pub fn build_query_string(&self) -> String {
        if self.columns.is_empty() {
            return format!("UPDATE {} SET updated_at = ? WHERE id = ?", self.table);
        }

        let mut assignments: Vec<String> =
            self.columns.iter().map(|c| format!("{c} = ?")).collect();
        assignments.push("updated_at = ?".to_string());
        format!(
            "UPDATE {} SET {} WHERE id = ?",
            self.table,
            assignments.join(", ")
        )
    }
}
