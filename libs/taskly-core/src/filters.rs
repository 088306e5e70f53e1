//! Declarative filtering, ordering, and pagination
//!
//! This module turns validated query parameters and saved-filter rules into
//! SQL fragments with positional placeholders. Field names are resolved
//! through per-entity allow-lists (`FilterSpec`, `Ordering`); values are
//! carried as `FilterValue` data and bound by the database layer, never
//! interpolated into SQL text.

use crate::error::{Result, TasklyError};
use crate::models::FilterRule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskly_common::{MAX_ITEMS_PER_PAGE, MAX_PAGE};
use uuid::Uuid;

/// Comparison operator of a single filter predicate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
    In,
    NotIn,
    Between,
}

impl FilterOperator {
    /// Stable name used in error messages and rule payloads
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Like => "like",
            Self::NotLike => "notLike",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Between => "between",
        }
    }

    /// Render the predicate for `column` with positional placeholders
    ///
    /// `value_count` is the number of scalars the bound value flattens to;
    /// only `In`/`NotIn` produce a variable number of placeholders.
    #[must_use]
    pub fn render(&self, column: &str, value_count: usize) -> String {
        match self {
            Self::Eq => format!("{column} = ?"),
            Self::Ne => format!("{column} != ?"),
            Self::Lt => format!("{column} < ?"),
            Self::Le => format!("{column} <= ?"),
            Self::Gt => format!("{column} > ?"),
            Self::Ge => format!("{column} >= ?"),
            Self::Like => format!("{column} LIKE ? ESCAPE '\\'"),
            Self::NotLike => format!("{column} NOT LIKE ? ESCAPE '\\'"),
            Self::In => format!("{column} IN ({})", placeholders(value_count)),
            Self::NotIn => format!("{column} NOT IN ({})", placeholders(value_count)),
            Self::Between => format!("{column} BETWEEN ? AND ?"),
        }
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Escape LIKE metacharacters so user text matches literally
///
/// Patterns built from user input get `%` wrapping for substring search;
/// a `%` or `_` inside the input itself must not act as a wildcard.
#[must_use]
pub fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// A typed value carried by a filter predicate
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    List(Vec<FilterValue>),
    Range(Box<(FilterValue, FilterValue)>),
}

impl FilterValue {
    /// Number of scalar placeholders this value binds to
    #[must_use]
    pub fn scalar_count(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            Self::Range(_) => 2,
            _ => 1,
        }
    }

    /// Flatten nested values into scalar bind order
    pub fn flatten_into(&self, out: &mut Vec<FilterValue>) {
        match self {
            Self::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
            Self::Range(bounds) => {
                bounds.0.flatten_into(out);
                bounds.1.flatten_into(out);
            }
            scalar => out.push(scalar.clone()),
        }
    }
}

/// One validated WHERE predicate, still in field-name terms
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl Condition {
    #[must_use]
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }
}

/// Scalar type of a filterable field, used to coerce rule values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Real,
    Timestamp,
    Uuid,
}

/// One filterable field: external name, storage column, allowed operators
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
    pub operators: &'static [FilterOperator],
}

/// A condition resolved against a `FilterSpec`: column known, operator allowed
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCondition {
    pub column: &'static str,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

/// Per-entity allow-list of filterable fields
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub entity: &'static str,
    pub fields: &'static [FilterField],
}

impl FilterSpec {
    /// Look up a field by its external name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FilterField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolve a condition to its storage column, rejecting unknown fields
    /// and operators the field does not allow
    ///
    /// # Errors
    ///
    /// Returns a validation error for unknown fields or disallowed operators
    pub fn resolve(&self, condition: &Condition) -> Result<ResolvedCondition> {
        let field = self.field(&condition.field).ok_or_else(|| {
            TasklyError::validation(format!(
                "unknown filter field `{}` for {}",
                condition.field, self.entity
            ))
        })?;

        if !field.operators.contains(&condition.operator) {
            return Err(TasklyError::validation(format!(
                "operator `{}` is not allowed on {}.{}",
                condition.operator.as_str(),
                self.entity,
                field.name
            )));
        }

        Ok(ResolvedCondition {
            column: field.column,
            operator: condition.operator,
            value: condition.value.clone(),
        })
    }

    /// Resolve a batch of conditions
    ///
    /// # Errors
    ///
    /// Returns the first validation error encountered
    pub fn resolve_all(&self, conditions: &[Condition]) -> Result<Vec<ResolvedCondition>> {
        conditions.iter().map(|c| self.resolve(c)).collect()
    }
}

/// One orderable field: external name and storage column
#[derive(Debug, Clone, Copy)]
pub struct OrderField {
    pub name: &'static str,
    pub column: &'static str,
}

/// Per-entity ordering allow-list
///
/// Parses `orderBy` values of the form `name,-created_at` (leading `-` for
/// descending). Unknown field names are rejected.
#[derive(Debug, Clone, Copy)]
pub struct Ordering {
    pub entity: &'static str,
    pub fields: &'static [OrderField],
    pub default: &'static str,
}

impl Ordering {
    /// Resolve an `orderBy` parameter into an ORDER BY clause body
    ///
    /// Falls back to the entity default when no ordering is requested. The
    /// primary key is always appended as a tiebreaker so pagination is
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a field name is not in the allow-list
    pub fn resolve(&self, order_by: Option<&str>) -> Result<String> {
        let spec = order_by.unwrap_or(self.default);
        let mut terms = Vec::new();

        for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let (name, direction) = match token.strip_prefix('-') {
                Some(name) => (name, "DESC"),
                None => (token, "ASC"),
            };
            let field = self.fields.iter().find(|f| f.name == name).ok_or_else(|| {
                TasklyError::validation(format!(
                    "unknown order field `{name}` for {}",
                    self.entity
                ))
            })?;
            terms.push(format!("{} {direction}", field.column));
        }

        if terms.is_empty() {
            // The default is a field name and goes through the same lookup
            let column = self
                .fields
                .iter()
                .find(|f| f.name == self.default)
                .map_or(self.default, |f| f.column);
            terms.push(format!("{column} ASC"));
        }
        terms.push("id ASC".to_string());
        Ok(terms.join(", "))
    }
}

/// Validated 1-based pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    items_per_page: u32,
}

impl Pagination {
    /// Build a pagination window, checking both bounds
    ///
    /// # Errors
    ///
    /// Returns a validation error when `page` is outside `1..=1000` or
    /// `items_per_page` is outside `1..=200`
    pub fn new(page: u32, items_per_page: u32) -> Result<Self> {
        if page < 1 || page > MAX_PAGE {
            return Err(TasklyError::validation(format!(
                "page must be between 1 and {MAX_PAGE}, got {page}"
            )));
        }
        if items_per_page < 1 || items_per_page > MAX_ITEMS_PER_PAGE {
            return Err(TasklyError::validation(format!(
                "itemsPerPage must be between 1 and {MAX_ITEMS_PER_PAGE}, got {items_per_page}"
            )));
        }
        Ok(Self {
            page,
            items_per_page,
        })
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.items_per_page)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.items_per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: taskly_common::DEFAULT_PAGE,
            items_per_page: taskly_common::DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

/// Accessors shared by all per-entity query parameter structs
pub trait PageParams {
    /// Validated pagination window
    ///
    /// # Errors
    ///
    /// Returns a validation error when the requested window is out of bounds
    fn pagination(&self) -> Result<Pagination>;

    /// Raw `orderBy` parameter, if any
    fn order_by(&self) -> Option<&str>;
}

/// Builder for paginated SELECT statements over resolved conditions
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    table: &'static str,
    conditions: Vec<ResolvedCondition>,
    order_clause: String,
    pagination: Pagination,
}

impl SelectBuilder {
    #[must_use]
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            conditions: Vec::new(),
            order_clause: String::new(),
            pagination: Pagination::default(),
        }
    }

    #[must_use]
    pub fn conditions(mut self, conditions: Vec<ResolvedCondition>) -> Self {
        self.conditions = conditions;
        self
    }

    #[must_use]
    pub fn order_by(mut self, clause: String) -> Self {
        self.order_clause = clause;
        self
    }

    #[must_use]
    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// Build the SQL text and the scalar bind values in positional order
    #[must_use]
    pub fn build(&self) -> (String, Vec<FilterValue>) {
        let mut sql = format!("SELECT * FROM {}", self.table);
        let mut values = Vec::new();

        if !self.conditions.is_empty() {
            let predicates: Vec<String> = self
                .conditions
                .iter()
                .map(|c| c.operator.render(c.column, c.value.scalar_count()))
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
            for condition in &self.conditions {
                condition.value.flatten_into(&mut values);
            }
        }

        if !self.order_clause.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_clause);
        }

        sql.push_str(" LIMIT ? OFFSET ?");
        values.push(FilterValue::Integer(self.pagination.limit()));
        values.push(FilterValue::Integer(self.pagination.offset()));

        (sql, values)
    }
}

/// Parse a comma-separated list of UUIDs (the `ids` query parameter)
///
/// # Errors
///
/// Returns a validation error when the list is empty or contains a
/// malformed UUID
pub fn parse_id_list(raw: &str) -> Result<Vec<Uuid>> {
    let ids: Vec<Uuid> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s)
                .map_err(|_| TasklyError::validation(format!("invalid UUID in ids: {s}")))
        })
        .collect::<Result<_>>()?;

    if ids.is_empty() {
        return Err(TasklyError::validation("ids must contain at least one UUID"));
    }
    Ok(ids)
}

fn coerce_scalar(spec: &FilterSpec, field: &FilterField, value: &serde_json::Value) -> Result<FilterValue> {
    let mismatch = || {
        TasklyError::validation(format!(
            "rule value for {}.{} does not match field type",
            spec.entity, field.name
        ))
    };

    match field.kind {
        FieldKind::Text => value
            .as_str()
            .map(|s| FilterValue::Text(s.to_string()))
            .ok_or_else(mismatch),
        FieldKind::Integer => value.as_i64().map(FilterValue::Integer).ok_or_else(mismatch),
        FieldKind::Real => value.as_f64().map(FilterValue::Real).ok_or_else(mismatch),
        FieldKind::Timestamp => value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| FilterValue::Timestamp(dt.with_timezone(&Utc)))
            .ok_or_else(mismatch),
        FieldKind::Uuid => value
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(FilterValue::Uuid)
            .ok_or_else(mismatch),
    }
}

/// Lower saved-filter rules into conditions, validating each rule against
/// the target entity's filter spec
///
/// The value shape must match the operator: `between` needs a two-element
/// array, `in`/`notIn` need a non-empty array, `like`/`notLike` need a
/// string (wrapped for substring matching), everything else needs a scalar.
///
/// # Errors
///
/// Returns a validation error for unknown fields, disallowed operators, or
/// value shapes that do not fit the operator
pub fn rules_to_conditions(spec: &FilterSpec, rules: &[FilterRule]) -> Result<Vec<Condition>> {
    rules
        .iter()
        .map(|rule| {
            let field = spec.field(&rule.field).ok_or_else(|| {
                TasklyError::validation(format!(
                    "unknown filter field `{}` for {}",
                    rule.field, spec.entity
                ))
            })?;

            if !field.operators.contains(&rule.operator) {
                return Err(TasklyError::validation(format!(
                    "operator `{}` is not allowed on {}.{}",
                    rule.operator.as_str(),
                    spec.entity,
                    field.name
                )));
            }

            let value = match rule.operator {
                FilterOperator::Between => {
                    let bounds = rule.value.as_array().filter(|a| a.len() == 2).ok_or_else(
                        || {
                            TasklyError::validation(format!(
                                "`between` on {}.{} needs exactly two bounds",
                                spec.entity, field.name
                            ))
                        },
                    )?;
                    let low = coerce_scalar(spec, field, &bounds[0])?;
                    let high = coerce_scalar(spec, field, &bounds[1])?;
                    FilterValue::Range(Box::new((low, high)))
                }
                FilterOperator::In | FilterOperator::NotIn => {
                    let items = rule
                        .value
                        .as_array()
                        .filter(|a| !a.is_empty())
                        .ok_or_else(|| {
                            TasklyError::validation(format!(
                                "`{}` on {}.{} needs a non-empty list",
                                rule.operator.as_str(),
                                spec.entity,
                                field.name
                            ))
                        })?;
                    FilterValue::List(
                        items
                            .iter()
                            .map(|v| coerce_scalar(spec, field, v))
                            .collect::<Result<_>>()?,
                    )
                }
                FilterOperator::Like | FilterOperator::NotLike => {
                    let pattern = rule.value.as_str().ok_or_else(|| {
                        TasklyError::validation(format!(
                            "`{}` on {}.{} needs a string value",
                            rule.operator.as_str(),
                            spec.entity,
                            field.name
                        ))
                    })?;
                    FilterValue::Text(format!("%{}%", escape_like(pattern)))
                }
                _ => coerce_scalar(spec, field, &rule.value)?,
            };

            Ok(Condition::new(field.name, rule.operator, value))
        })
        .collect()
}
