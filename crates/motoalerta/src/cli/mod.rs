//! Command-line interface for motoalerta.
//!
//! This module provides the CLI structure and command handlers for the
//! `moto` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AnalyzeCommand, ConfigCommand, DashboardCommand, OutputFormat, RecoverCommand, ReportCommand,
    SearchCommand,
};

/// moto - Report and track stolen motorcycles
///
/// A local-first incident tracker: report thefts with a captured location,
/// search reports by plate, mark recoveries, and view an approximate map
/// with an optional AI hotspot summary.
#[derive(Debug, Parser)]
#[command(name = "moto")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report a stolen motorcycle
    Report(ReportCommand),

    /// Look up a report by plate
    Search(SearchCommand),

    /// Mark a reported motorcycle as recovered
    Recover(RecoverCommand),

    /// Show the theft map and report listing
    Dashboard(DashboardCommand),

    /// Generate an AI hotspot analysis of open reports
    Analyze(AnalyzeCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
