use crate::error::{Result, TasklyError};
use serde::{Deserialize, Serialize};
use sqlx::{pool::PoolOptions, SqlitePool};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Database connection pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabasePoolConfig {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    pub min_connections: u32,
    /// Connection acquire timeout
    pub connect_timeout: Duration,
    /// Test connections before use
    pub test_before_acquire: bool,
}

impl Default for DatabasePoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            test_before_acquire: true,
        }
    }
}

/// Row counts per entity table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub project_count: usize,
    pub task_count: usize,
    pub filter_count: usize,
}

const SCHEMA_STATEMENTS: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS projects (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL DEFAULT 'not_started',
        start_date TEXT,
        deadline_date TEXT,
        parent_project_id TEXT REFERENCES projects(id),
        kind TEXT NOT NULL DEFAULT 'project',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS tasks (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL DEFAULT 'not_started',
        start_date TEXT,
        deadline_date TEXT,
        project_id TEXT REFERENCES projects(id),
        parent_task_id TEXT REFERENCES tasks(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        CHECK (
            (project_id IS NOT NULL AND parent_task_id IS NULL)
            OR (project_id IS NULL AND parent_task_id IS NOT NULL)
        )
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS filters (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        target TEXT NOT NULL,
        rules TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_projects_parent_project_id ON projects(parent_project_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_parent_task_id ON tasks(parent_task_id)",
];

/// SQLite-backed storage for Taskly data
///
/// Wraps an async connection pool; cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    config: DatabasePoolConfig,
}

impl Database {
    /// Open (or create) a database file with default pool configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or if `SQLite`
    /// configuration fails
    #[instrument]
    pub async fn new(database_path: &Path) -> Result<Self> {
        Self::new_with_config(database_path, DatabasePoolConfig::default()).await
    }

    /// Open (or create) a database file with custom pool configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or if `SQLite`
    /// configuration fails
    #[instrument]
    pub async fn new_with_config(
        database_path: &Path,
        config: DatabasePoolConfig,
    ) -> Result<Self> {
        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());

        info!("Connecting to SQLite database at: {}", database_url);

        let pool = PoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .test_before_acquire(config.test_before_acquire)
            .connect(&database_url)
            .await
            .map_err(|e| TasklyError::database(format!("Failed to connect to database: {e}")))?;

        Self::apply_sqlite_settings(&pool).await?;

        info!(
            "Database connection pool established with {} max connections",
            config.max_connections
        );

        Ok(Self { pool, config })
    }

    /// Apply the SQLite settings every connection relies on
    async fn apply_sqlite_settings(pool: &SqlitePool) -> Result<()> {
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(pool)
            .await
            .map_err(|e| TasklyError::database(format!("Failed to set journal mode: {e}")))?;

        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(pool)
            .await
            .map_err(|e| TasklyError::database(format!("Failed to set synchronous mode: {e}")))?;

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(pool)
            .await
            .map_err(|e| TasklyError::database(format!("Failed to enable foreign keys: {e}")))?;

        debug!("Applied SQLite settings: WAL, synchronous=NORMAL, foreign_keys=ON");
        Ok(())
    }

    /// Create the schema if it does not exist yet
    ///
    /// Idempotent; safe to run on every startup.
    ///
    /// # Errors
    ///
    /// Returns an error if any schema statement fails
    #[instrument(skip(self))]
    pub async fn initialize_schema(&self) -> Result<()> {
        for statement in SCHEMA_STATEMENTS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| TasklyError::database(format!("Failed to create schema: {e}")))?;
        }
        info!("Database schema initialized");
        Ok(())
    }

    /// Get the underlying connection pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the pool configuration
    #[must_use]
    pub fn config(&self) -> &DatabasePoolConfig {
        &self.config
    }

    /// Check if the database is reachable
    #[instrument(skip(self))]
    pub async fn is_connected(&self) -> bool {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => {
                debug!("Database connection is healthy");
                true
            }
            Err(e) => {
                error!("Database connection check failed: {}", e);
                false
            }
        }
    }

    /// Get row counts for all entity tables
    ///
    /// # Errors
    ///
    /// Returns an error if a count query fails
    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> Result<DatabaseStats> {
        let project_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| TasklyError::database(format!("Failed to get project count: {e}")))?;

        let task_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| TasklyError::database(format!("Failed to get task count: {e}")))?;

        let filter_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM filters")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| TasklyError::database(format!("Failed to get filter count: {e}")))?;

        Ok(DatabaseStats {
            project_count: project_count.try_into().unwrap_or(0),
            task_count: task_count.try_into().unwrap_or(0),
            filter_count: filter_count.try_into().unwrap_or(0),
        })
    }
}
