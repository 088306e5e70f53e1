//! Request handlers, one module per resource

pub mod filters;
pub mod health;
pub mod projects;
pub mod tasks;
