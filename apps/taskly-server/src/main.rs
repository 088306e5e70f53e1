//! Taskly server binary

use anyhow::Result;
use clap::Parser;
use taskly_core::{Database, TasklyConfig};
use taskly_server::server::{serve, AppState};
use taskly_server::{Cli, Commands};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = TasklyConfig::from_env()?;
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            let database = Database::new(&config.database_path).await?;
            database.initialize_schema().await?;
            info!("Using database at {}", config.database_path.display());

            let state = AppState::new(database);
            serve(&config, state).await
        }
        Commands::Migrate => {
            let database = Database::new(&config.database_path).await?;
            database.initialize_schema().await?;
            println!("Schema ready at {}", config.database_path.display());
            Ok(())
        }
    }
}
