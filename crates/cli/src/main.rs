//! Shopscout CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending database migrations
//! scout-cli migrate
//!
//! # Drop the application schemas and migrate from scratch
//! scout-cli init-db --force
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `init-db` - Recreate the database schemas from scratch

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "scout-cli")]
#[command(author, version, about = "Shopscout CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Drop the application schemas and run all migrations from scratch
    InitDb {
        /// Confirm destroying all existing Shopscout data
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::InitDb { force } => commands::init_db::run(force).await?,
    }
    Ok(())
}
