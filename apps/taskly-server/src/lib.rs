//! Taskly Server - REST API over the Taskly core library
//!
//! Thin HTTP glue: axum routes per resource, error-to-status mapping, and a
//! clap CLI for running the server or preparing the schema. All domain
//! behavior lives in `taskly-core`.

pub mod error;
pub mod handlers;
pub mod server;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Taskly REST server
#[derive(Parser)]
#[command(name = "taskly-server", version, about)]
pub struct Cli {
    /// Path to the SQLite database file
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Bind port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Create or upgrade the database schema, then exit
    Migrate,
}
