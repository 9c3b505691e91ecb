//! `motoalerta` - A local-first stolen motorcycle incident tracker
//!
//! This library provides the core functionality for reporting thefts,
//! searching and recovering reports, plotting an approximate theft map,
//! and requesting an AI-generated hotspot summary.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod geo;
pub mod incident;
pub mod logging;
pub mod store;

pub use analysis::TheftAnalyzer;
pub use config::Config;
pub use error::{Error, Result};
pub use incident::{IncidentRecord, IncidentStatus, Location};
pub use logging::init_logging;
pub use store::IncidentStore;
