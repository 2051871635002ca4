// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for --json output
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Head { operator, catalog } => commands::cmd_head(
            &operator,
            catalog.db_path.as_deref(),
            catalog.bundles.as_deref(),
        ),

        Commands::Path {
            request,
            catalog,
            json,
        } => commands::cmd_path(
            &request.operator,
            &request.start_version,
            request.target_version.as_deref(),
            catalog.db_path.as_deref(),
            catalog.bundles.as_deref(),
            json,
        ),

        Commands::Plan {
            request,
            catalog,
            json,
        } => commands::cmd_plan(
            &request.operator,
            &request.start_version,
            request.target_version.as_deref(),
            catalog.db_path.as_deref(),
            catalog.bundles.as_deref(),
            json,
        ),

        Commands::Graph { request, catalog } => commands::cmd_graph(
            &request.operator,
            &request.start_version,
            request.target_version.as_deref(),
            catalog.db_path.as_deref(),
            catalog.bundles.as_deref(),
        ),

        Commands::Batch {
            config,
            catalog,
            json,
        } => commands::cmd_batch(
            &config,
            catalog.db_path.as_deref(),
            catalog.bundles.as_deref(),
            json,
        ),

        Commands::Packages { catalog } => {
            commands::cmd_packages(catalog.db_path.as_deref(), catalog.bundles.as_deref())
        }
    }
}
