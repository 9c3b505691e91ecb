//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// The motorcycle's plate
    pub plate: String,

    /// Latitude of the theft (skips geolocation lookup)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the theft (skips geolocation lookup)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// The plate to look up (case-insensitive exact match)
    pub plate: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Recover command arguments.
#[derive(Debug, Args)]
pub struct RecoverCommand {
    /// The plate of the recovered motorcycle
    pub plate: String,

    /// Latitude of the recovery (skips geolocation lookup)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the recovery (skips geolocation lookup)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

/// Dashboard command arguments.
#[derive(Debug, Args)]
pub struct DashboardCommand {
    /// Width of the map plot in characters
    #[arg(long, default_value = "60")]
    pub width: usize,

    /// Height of the map plot in characters
    #[arg(long, default_value = "20")]
    pub height: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Analyze command arguments.
#[derive(Debug, Args)]
pub struct AnalyzeCommand {}

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
