//! Generic filtered repository over a `SqlitePool`
//!
//! One `Repository<E>` instance per entity; `EntitySpec` supplies the table
//! layout, filter and ordering allow-lists, row mapping, and the two hooks
//! (`validate`, `post_processing`) that run around every action.

use crate::database::query_builders::{bind_value, InsertBuilder, UpdateBuilder};
use crate::error::{Result, TasklyError};
use crate::filters::{Condition, FilterSpec, FilterValue, Ordering, PageParams, Pagination, SelectBuilder};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use std::marker::PhantomData;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// The action a hook is running for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudAction {
    Create,
    Read,
    Filter,
    Update,
    Delete,
}

impl CrudAction {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Filter => "filter",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// The request a `validate` hook inspects, by action
#[derive(Debug)]
pub enum HookRequest<'a, E: EntitySpec> {
    Create {
        data: &'a E::Create,
    },
    Read {
        id: Uuid,
    },
    Filter,
    Update {
        id: Uuid,
        data: &'a E::Update,
        current: &'a E::Model,
    },
    Delete {
        id: Uuid,
        current: &'a E::Model,
    },
}

/// Static description of one entity: storage layout, allow-lists, row
/// mapping, and the template-method hooks
pub trait EntitySpec: Send + Sync + 'static {
    /// Persisted model returned by every operation
    type Model: Send + Sync;
    /// Creation payload
    type Create: Send + Sync + std::fmt::Debug;
    /// Partial-update payload
    type Update: Send + Sync + std::fmt::Debug;
    /// List query parameters
    type Params: PageParams + Send + Sync;

    /// Entity name used in errors and logs
    const ENTITY: &'static str;
    /// Storage table
    const TABLE: &'static str;
    /// Updatable column names; the schema-drift allow-list for updates
    const COLUMNS: &'static [&'static str];

    fn filter_spec() -> &'static FilterSpec;
    fn ordering() -> &'static Ordering;

    /// Map a storage row to the model
    ///
    /// # Errors
    ///
    /// Returns an error when a stored value cannot be converted
    fn map_row(row: &SqliteRow) -> Result<Self::Model>;

    /// Translate list parameters into filter conditions
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed parameter values
    fn conditions(params: &Self::Params) -> Result<Vec<Condition>>;

    /// Column-value pairs to insert; only populated fields
    ///
    /// # Errors
    ///
    /// Returns an error when a payload value cannot be serialized
    fn insert_values(data: &Self::Create) -> Result<Vec<(&'static str, FilterValue)>>;

    /// Column-value pairs to update; only populated fields
    ///
    /// # Errors
    ///
    /// Returns an error when a payload value cannot be serialized
    fn update_values(data: &Self::Update) -> Result<Vec<(&'static str, FilterValue)>>;

    /// Pre-action business-rule check; runs before any SQL
    ///
    /// # Errors
    ///
    /// Returns a validation error when the request breaks an entity rule
    fn validate(action: CrudAction, request: &HookRequest<'_, Self>) -> Result<()>
    where
        Self: Sized,
    {
        let _ = (action, request);
        Ok(())
    }

    /// Post-action side effect; runs after the action committed
    fn post_processing(action: CrudAction, model: Option<&Self::Model>)
    where
        Self: Sized,
    {
        let _ = (action, model);
    }
}

/// Generic CRUD repository for one entity
///
/// Cloning is cheap and shares the pool. Every mutation runs in a single
/// transaction, re-fetches the row afterwards, and converts constraint
/// violations into `Conflict`.
#[derive(Debug)]
pub struct Repository<E: EntitySpec> {
    pool: SqlitePool,
    _entity: PhantomData<E>,
}

impl<E: EntitySpec> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: EntitySpec> Repository<E> {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// Get the underlying connection pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Fetch a row by id without running hooks
    async fn fetch(&self, id: Uuid) -> Result<Option<E::Model>> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", E::TABLE);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TasklyError::store("fetch by id", &e))?;

        row.as_ref().map(E::map_row).transpose()
    }

    /// Create a record with a server-assigned id and timestamps
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the payload breaks an entity rule and
    /// `Conflict` when a store constraint rejects it
    #[instrument(skip(self, data), fields(entity = E::ENTITY))]
    pub async fn create(&self, data: &E::Create) -> Result<E::Model> {
        E::validate(CrudAction::Create, &HookRequest::Create { data })?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        let mut builder = InsertBuilder::new(E::TABLE).column("id", FilterValue::Uuid(id));
        for (column, value) in E::insert_values(data)? {
            builder = builder.column(column, value);
        }
        builder = builder
            .column("created_at", FilterValue::Timestamp(now))
            .column("updated_at", FilterValue::Timestamp(now));

        let sql = builder.build_query_string();
        debug!("Executing insert: {}", sql);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TasklyError::store("begin transaction", &e))?;

        let mut query = sqlx::query(&sql);
        for value in builder.values() {
            query = bind_value(query, value);
        }
        query
            .execute(&mut *tx)
            .await
            .map_err(|e| TasklyError::store(&format!("insert {}", E::ENTITY), &e))?;

        tx.commit()
            .await
            .map_err(|e| TasklyError::store("commit transaction", &e))?;

        // Re-fetch so the caller sees exactly what was persisted
        let model = self
            .fetch(id)
            .await?
            .ok_or_else(|| TasklyError::not_found(E::ENTITY, id))?;

        info!("Created {} {}", E::ENTITY, id);
        E::post_processing(CrudAction::Create, Some(&model));
        Ok(model)
    }

    /// Get a record by id
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no record has this id
    #[instrument(skip(self), fields(entity = E::ENTITY))]
    pub async fn get(&self, id: Uuid) -> Result<E::Model> {
        E::validate(CrudAction::Read, &HookRequest::Read { id })?;

        let model = self
            .fetch(id)
            .await?
            .ok_or_else(|| TasklyError::not_found(E::ENTITY, id))?;

        E::post_processing(CrudAction::Read, Some(&model));
        Ok(model)
    }

    /// Run validated conditions through the shared SELECT pipeline
    ///
    /// Also the execution path for saved-filter results, which lower their
    /// rules into the same `Condition` form.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for unknown fields, disallowed operators, or an
    /// out-of-bounds ordering/pagination request
    #[instrument(skip(self, conditions), fields(entity = E::ENTITY))]
    pub async fn find(
        &self,
        conditions: &[Condition],
        order_by: Option<&str>,
        pagination: Pagination,
    ) -> Result<Vec<E::Model>> {
        let resolved = E::filter_spec().resolve_all(conditions)?;
        let order_clause = E::ordering().resolve(order_by)?;

        let (sql, values) = SelectBuilder::new(E::TABLE)
            .conditions(resolved)
            .order_by(order_clause)
            .paginate(pagination)
            .build();
        debug!("Executing select: {}", sql);

        let mut query = sqlx::query(&sql);
        for value in &values {
            query = bind_value(query, value);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TasklyError::store(&format!("select {}", E::ENTITY), &e))?;

        rows.iter().map(E::map_row).collect()
    }

    /// List records matching the query parameters
    ///
    /// Returns at most `itemsPerPage` records; a page past the end of the
    /// collection is an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for out-of-bounds pagination or unknown
    /// filter/order fields
    #[instrument(skip(self, params), fields(entity = E::ENTITY))]
    pub async fn get_multi(&self, params: &E::Params) -> Result<Vec<E::Model>> {
        E::validate(CrudAction::Filter, &HookRequest::Filter)?;

        let pagination = params.pagination()?;
        let conditions = E::conditions(params)?;
        let models = self.find(&conditions, params.order_by(), pagination).await?;

        debug!("Listed {} {} record(s)", models.len(), E::ENTITY);
        E::post_processing(CrudAction::Filter, None);
        Ok(models)
    }

    /// Apply a partial update, bumping `updated_at`
    ///
    /// Only populated fields are written; everything else is untouched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no record has this id, `UnknownField` when a
    /// field is not in the entity's column allow-list, `Validation` when the
    /// merged state breaks an entity rule, and `Conflict` on constraint
    /// violations
    #[instrument(skip(self, data), fields(entity = E::ENTITY))]
    pub async fn update(&self, id: Uuid, data: &E::Update) -> Result<E::Model> {
        let current = self
            .fetch(id)
            .await?
            .ok_or_else(|| TasklyError::not_found(E::ENTITY, id))?;

        E::validate(
            CrudAction::Update,
            &HookRequest::Update {
                id,
                data,
                current: &current,
            },
        )?;

        let mut builder = UpdateBuilder::new(E::TABLE);
        for (column, value) in E::update_values(data)? {
            if !E::COLUMNS.contains(&column) {
                return Err(TasklyError::unknown_field(E::ENTITY, column));
            }
            builder = builder.set(column, value);
        }

        let sql = builder.build_query_string();
        debug!("Executing update of {:?}: {}", builder.fields(), sql);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TasklyError::store("begin transaction", &e))?;

        let mut query = sqlx::query(&sql);
        for value in builder.values() {
            query = bind_value(query, value);
        }
        query = bind_value(query, &FilterValue::Timestamp(Utc::now()));
        query = query.bind(id.to_string());
        query
            .execute(&mut *tx)
            .await
            .map_err(|e| TasklyError::store(&format!("update {}", E::ENTITY), &e))?;

        tx.commit()
            .await
            .map_err(|e| TasklyError::store("commit transaction", &e))?;

        let model = self
            .fetch(id)
            .await?
            .ok_or_else(|| TasklyError::not_found(E::ENTITY, id))?;

        info!("Updated {} {}", E::ENTITY, id);
        E::post_processing(CrudAction::Update, Some(&model));
        Ok(model)
    }

    /// Hard-delete a record
    ///
    /// Deleting the same id twice reports `NotFound` the second time.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no record has this id and `Conflict` when
    /// other records still reference it
    #[instrument(skip(self), fields(entity = E::ENTITY))]
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let current = self
            .fetch(id)
            .await?
            .ok_or_else(|| TasklyError::not_found(E::ENTITY, id))?;

        E::validate(
            CrudAction::Delete,
            &HookRequest::Delete {
                id,
                current: &current,
            },
        )?;

        let sql = format!("DELETE FROM {} WHERE id = ?", E::TABLE);
        sqlx::query(&sql)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| TasklyError::store(&format!("delete {}", E::ENTITY), &e))?;

        info!("Deleted {} {}", E::ENTITY, id);
        E::post_processing(CrudAction::Delete, Some(&current));
        Ok(())
    }
}
