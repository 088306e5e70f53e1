//! Database module - pool management, row mapping, and the generic repository

mod core;
pub mod entities;
pub mod mappers;
pub mod query_builders;
mod repository;
pub mod validators;

pub use core::{Database, DatabasePoolConfig, DatabaseStats};
pub use entities::{spec_for_target, FilterEntity, ProjectEntity, TaskEntity};
pub use repository::{CrudAction, EntitySpec, HookRequest, Repository};
