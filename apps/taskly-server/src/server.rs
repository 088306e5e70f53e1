//! Application state, router assembly, and the serve loop

use crate::handlers;
use axum::routing::get;
use axum::Router;
use taskly_core::{
    Database, FilterEntity, ProjectEntity, Repository, TaskEntity, TasklyConfig,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared application state
///
/// Repositories share the database's connection pool; cloning the state is
/// cheap.
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub projects: Repository<ProjectEntity>,
    pub tasks: Repository<TaskEntity>,
    pub filters: Repository<FilterEntity>,
}

impl AppState {
    #[must_use]
    pub fn new(database: Database) -> Self {
        let pool = database.pool().clone();
        Self {
            projects: Repository::new(pool.clone()),
            tasks: Repository::new(pool.clone()),
            filters: Repository::new(pool),
            database,
        }
    }
}

/// Assemble the full application router
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/projects/",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(handlers::projects::get_project)
                .patch(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route(
            "/tasks/",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(handlers::tasks::get_task)
                .patch(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .route(
            "/filters/",
            get(handlers::filters::list_filters).post(handlers::filters::create_filter),
        )
        .route(
            "/filters/:id",
            get(handlers::filters::get_filter)
                .patch(handlers::filters::update_filter)
                .delete(handlers::filters::delete_filter),
        )
        .route("/filters/:id/results", get(handlers::filters::filter_results))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and run the server until shutdown
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails
pub async fn serve(config: &TasklyConfig, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("Taskly server listening on {}:{}", config.host, config.port);

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
