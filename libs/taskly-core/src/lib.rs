//! Taskly Core - Domain models, filtered repository, and SQLite storage
//!
//! This library backs the Taskly REST server with a reusable data layer:
//!
//! - **Async Database Access**: Built on SQLx for type-safe, async database operations
//! - **Generic Filtered Repository**: One `Repository<E>` per entity, driven by a
//!   declarative per-entity `EntitySpec` (filterable fields, ordering allow-list,
//!   validation hooks)
//! - **Declarative Filtering**: Field operators, pagination, and ordering translated
//!   into parameterized SQL
//! - **Saved Filters**: Persisted rule sets evaluated through the same query pipeline
//!
//! # Quick Start
//!
//! ```no_run
//! use taskly_core::{Database, ProjectEntity, Repository, TasklyError};
//! use taskly_core::models::ProjectFilterParams;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), TasklyError> {
//! let db = Database::new(Path::new("/path/to/taskly.sqlite")).await?;
//! db.initialize_schema().await?;
//!
//! let projects: Repository<ProjectEntity> = Repository::new(db.pool().clone());
//! let params = ProjectFilterParams {
//!     name: Some("renovation".to_string()),
//!     ..Default::default()
//! };
//! let matching = projects.get_multi(&params).await?;
//! println!("Found {} project(s)", matching.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Crate Features
//!
//! - `test-utils`: Enable test utilities (for testing only)

pub mod config;
pub mod database;
pub mod error;
pub mod filters;
pub mod models;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::TasklyConfig;
pub use database::{
    spec_for_target, CrudAction, Database, DatabasePoolConfig, DatabaseStats, EntitySpec,
    FilterEntity, HookRequest, ProjectEntity, Repository, TaskEntity,
};
pub use error::{Result, TasklyError};
pub use filters::{
    escape_like, parse_id_list, rules_to_conditions, Condition, FilterOperator, FilterSpec,
    FilterValue, Ordering, PageParams, Pagination, SelectBuilder,
};
pub use models::*;
