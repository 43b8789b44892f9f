//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on (overrides `server.bind`)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Directory for uploaded images (overrides `upload.directory`)
    #[arg(long, value_name = "DIR")]
    pub upload_dir: Option<PathBuf>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Planet listing arguments.
#[derive(Debug, Args)]
pub struct PlanetsCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Single planet lookup arguments.
#[derive(Debug, Args)]
pub struct PlanetCommand {
    /// Planet identifier
    pub id: i64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Single satellite lookup arguments.
#[derive(Debug, Args)]
pub struct SatelliteCommand {
    /// Satellite identifier
    pub id: i64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Upload command arguments.
#[derive(Debug, Args)]
pub struct UploadCommand {
    /// Planet identifier
    pub planet_id: i64,

    /// Image file to upload (jpg, jpeg, png or gif)
    pub file: PathBuf,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
