//! Error types for motoalerta.
//!
//! This module defines all error types used throughout the motoalerta crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for motoalerta operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// The plate field was empty.
    #[error("a plate is required")]
    EmptyPlate,

    /// A report already exists for this plate.
    #[error("a report already exists for plate {plate}")]
    DuplicatePlate {
        /// The normalized plate that collided.
        plate: String,
    },

    /// No report exists for this plate.
    #[error("no report found for plate {plate}")]
    RecordNotFound {
        /// The normalized plate that was looked up.
        plate: String,
    },

    /// The record was already marked as recovered.
    #[error("plate {plate} is already marked as recovered")]
    AlreadyRecovered {
        /// The normalized plate of the record.
        plate: String,
    },

    // === Geolocation Errors ===
    /// The location provider failed or timed out.
    #[error("could not obtain location: {message}")]
    Geolocation {
        /// Human-readable description of the failure.
        message: String,
    },

    // === Analysis Errors ===
    /// No API credential is configured for the analysis service.
    #[error("analysis API key is not configured")]
    MissingApiKey,

    /// The analysis service could not be reached or returned garbage.
    #[error("analysis service unavailable")]
    AnalysisUnavailable,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for motoalerta operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new geolocation error.
    #[must_use]
    pub fn geolocation(message: impl Into<String>) -> Self {
        Self::Geolocation {
            message: message.into(),
        }
    }

    /// Create a duplicate plate error.
    #[must_use]
    pub fn duplicate_plate(plate: impl Into<String>) -> Self {
        Self::DuplicatePlate {
            plate: plate.into(),
        }
    }

    /// Create a record not found error.
    #[must_use]
    pub fn record_not_found(plate: impl Into<String>) -> Self {
        Self::RecordNotFound {
            plate: plate.into(),
        }
    }

    /// Check if this error is a user-input validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyPlate
                | Self::DuplicatePlate { .. }
                | Self::RecordNotFound { .. }
                | Self::AlreadyRecovered { .. }
        )
    }

    /// Check if this error came from the geolocation layer.
    #[must_use]
    pub fn is_geolocation(&self) -> bool {
        matches!(self, Self::Geolocation { .. })
    }
}
