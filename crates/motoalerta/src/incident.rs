//! Core incident types for motoalerta.
//!
//! This module defines the fundamental data structures for representing
//! stolen motorcycle reports and their recovery lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A geographic position in WGS84 degrees.
///
/// Coordinates are intentionally unvalidated; reports carry whatever the
/// location provider returned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Location {
    /// Create a location from a latitude/longitude pair.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Lifecycle state of an incident.
///
/// Recovery details live inside the `Recovered` variant, so a record can
/// never claim recovery without both a location and a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IncidentStatus {
    /// The motorcycle is reported stolen and not yet recovered.
    Stolen,
    /// The motorcycle was recovered.
    Recovered {
        /// Where the motorcycle was recovered.
        recovery_location: Location,
        /// When the recovery was registered.
        recovery_date: DateTime<Utc>,
    },
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stolen => write!(f, "stolen"),
            Self::Recovered { .. } => write!(f, "recovered"),
        }
    }
}

/// A single stolen motorcycle report.
///
/// The normalized (uppercased) plate doubles as the record id and the
/// uniqueness key. Theft details are set at creation and never change;
/// the only legal mutation is the Stolen -> Recovered transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Unique identifier, equal to the normalized plate.
    pub id: String,

    /// The motorcycle's plate, normalized to uppercase.
    pub plate: String,

    /// Where the theft was reported.
    pub theft_location: Location,

    /// When the theft was reported.
    pub theft_date: DateTime<Utc>,

    /// Current lifecycle state.
    #[serde(flatten)]
    pub status: IncidentStatus,
}

impl IncidentRecord {
    /// Create a new stolen report for the given plate at the given location.
    ///
    /// The plate is normalized to uppercase and the theft date is stamped
    /// with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the plate is empty after trimming.
    pub fn new(plate: &str, theft_location: Location) -> Result<Self> {
        Self::with_theft_date(plate, theft_location, Utc::now())
    }

    /// Create a stolen report with an explicit theft date.
    ///
    /// # Errors
    ///
    /// Returns an error if the plate is empty after trimming.
    pub fn with_theft_date(
        plate: &str,
        theft_location: Location,
        theft_date: DateTime<Utc>,
    ) -> Result<Self> {
        let plate = validate_plate(plate)?;
        Ok(Self {
            id: plate.clone(),
            plate,
            theft_location,
            theft_date,
            status: IncidentStatus::Stolen,
        })
    }

    /// Transition this record to Recovered.
    ///
    /// Recovered is terminal; there is no path back to Stolen.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is already recovered.
    pub fn recover(&mut self, location: Location, date: DateTime<Utc>) -> Result<()> {
        match self.status {
            IncidentStatus::Stolen => {
                self.status = IncidentStatus::Recovered {
                    recovery_location: location,
                    recovery_date: date,
                };
                Ok(())
            }
            IncidentStatus::Recovered { .. } => Err(Error::AlreadyRecovered {
                plate: self.plate.clone(),
            }),
        }
    }

    /// Check whether this record is still an open (stolen) incident.
    #[must_use]
    pub fn is_stolen(&self) -> bool {
        matches!(self.status, IncidentStatus::Stolen)
    }

    /// Case-insensitive exact plate match.
    #[must_use]
    pub fn matches_plate(&self, query: &str) -> bool {
        self.plate == normalize_plate(query)
    }
}

/// Normalize a plate for use as id and uniqueness key.
#[must_use]
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

/// Normalize a plate, rejecting empty input.
///
/// This is the non-empty precondition of the report flow; callers check it
/// before doing any work on the report's behalf.
///
/// # Errors
///
/// Returns an error if the plate is empty after trimming.
pub fn validate_plate(plate: &str) -> Result<String> {
    let plate = normalize_plate(plate);
    if plate.is_empty() {
        return Err(Error::EmptyPlate);
    }
    Ok(plate)
}
