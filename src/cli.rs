// src/cli.rs
//! CLI definitions for opmirror
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "opmirror")]
#[command(author = "opmirror Contributors")]
#[command(version)]
#[command(about = "Resolve operator upgrade paths for disconnected catalog mirroring", long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to read catalog data from
#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Path to an extracted catalog index database
    #[arg(short, long, env = "OPMIRROR_DB")]
    pub db_path: Option<PathBuf>,

    /// Path to a static catalog JSON file (takes precedence over --db-path)
    #[arg(short, long)]
    pub bundles: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Operator package name
    pub operator: String,

    /// Currently installed version (omit to mirror only the channel head)
    #[arg(short, long, default_value = "")]
    pub start_version: String,

    /// Target version (default: head of the default channel)
    #[arg(short, long)]
    pub target_version: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show an operator's default channel and head version
    Head {
        /// Operator package name
        operator: String,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Print the shortest upgrade path
    Path {
        #[command(flatten)]
        request: RequestArgs,

        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the upgrade path with the bundle behind each version
    Plan {
        #[command(flatten)]
        request: RequestArgs,

        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump the version graph used for the search
    Graph {
        #[command(flatten)]
        request: RequestArgs,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Plan every operator listed in a TOML config file
    Batch {
        /// Path to the batch config
        #[arg(short, long)]
        config: PathBuf,

        /// Overrides the config's [catalog] section
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List packages in a catalog
    Packages {
        #[command(flatten)]
        catalog: CatalogArgs,
    },
}
