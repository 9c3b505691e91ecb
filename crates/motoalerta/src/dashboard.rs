//! Dashboard view computation for motoalerta.
//!
//! This module turns the stolen record set into a normalized 2D scatter
//! projection and renders it as an ASCII plot plus a tabular listing.
//! The projection is presentation math over a min/max bounding box, not a
//! geospatial projection.

use crate::incident::{IncidentRecord, Location};

/// Fraction of each axis range added as padding around the bounding box.
const PADDING: f64 = 0.1;

/// Lat/lon bounding box of the plotted area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lon: f64,
    /// Eastern edge.
    pub max_lon: f64,
}

/// Default plot area when no stolen records exist (the Bogotá area).
pub const DEFAULT_BOUNDS: Bounds = Bounds {
    min_lat: 4.4,
    max_lat: 4.8,
    min_lon: -74.2,
    max_lon: -73.9,
};

impl Bounds {
    /// Compute the bounding box of the given stolen records.
    ///
    /// Falls back to [`DEFAULT_BOUNDS`] when the set is empty.
    #[must_use]
    pub fn of(records: &[&IncidentRecord]) -> Self {
        if records.is_empty() {
            return DEFAULT_BOUNDS;
        }
        let mut bounds = Bounds {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        for record in records {
            let Location {
                latitude,
                longitude,
            } = record.theft_location;
            bounds.min_lat = bounds.min_lat.min(latitude);
            bounds.max_lat = bounds.max_lat.max(latitude);
            bounds.min_lon = bounds.min_lon.min(longitude);
            bounds.max_lon = bounds.max_lon.max(longitude);
        }
        bounds
    }

    /// Project a location into the padded box as `(left%, top%)`.
    ///
    /// `top` grows southward so north renders up. A degenerate box — either
    /// axis with zero range — centers the whole projection at (50, 50).
    #[must_use]
    pub fn project(&self, location: Location) -> (f64, f64) {
        let lat_range = self.max_lat - self.min_lat;
        let lon_range = self.max_lon - self.min_lon;

        let padded_lat_range = lat_range + lat_range * PADDING;
        let padded_lon_range = lon_range + lon_range * PADDING;
        let padded_min_lat = self.min_lat - (lat_range * PADDING / 2.0);
        let padded_min_lon = self.min_lon - (lon_range * PADDING / 2.0);

        if padded_lat_range == 0.0 || padded_lon_range == 0.0 {
            return (50.0, 50.0);
        }

        let left = ((location.longitude - padded_min_lon) / padded_lon_range) * 100.0;
        let top = 100.0 - ((location.latitude - padded_min_lat) / padded_lat_range) * 100.0;
        (left, top)
    }
}

/// A stolen record's position on the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    /// The record's plate.
    pub plate: String,
    /// Horizontal position, 0..=100 percent from the left edge.
    pub left: f64,
    /// Vertical position, 0..=100 percent from the top edge.
    pub top: f64,
}

/// Project every stolen record into plot coordinates.
#[must_use]
pub fn plot_points(stolen: &[&IncidentRecord]) -> Vec<PlotPoint> {
    let bounds = Bounds::of(stolen);
    stolen
        .iter()
        .map(|record| {
            let (left, top) = bounds.project(record.theft_location);
            PlotPoint {
                plate: record.plate.clone(),
                left,
                top,
            }
        })
        .collect()
}

/// Render the stolen set as an ASCII scatter plot.
///
/// Each record is drawn as a numbered marker with a legend mapping the
/// marker back to its plate.
#[must_use]
pub fn render_map(stolen: &[&IncidentRecord], width: usize, height: usize) -> String {
    let width = width.max(2);
    let height = height.max(2);
    let points = plot_points(stolen);

    let mut grid = vec![vec!['.'; width]; height];
    for (index, point) in points.iter().enumerate() {
        let col = percent_to_cell(point.left, width);
        let row = percent_to_cell(point.top, height);
        let marker = char::from_digit(u32::try_from((index + 1) % 10).unwrap_or(0), 10)
            .unwrap_or('*');
        grid[row][col] = marker;
    }

    let mut out = String::new();
    out.push('+');
    out.push_str(&"-".repeat(width));
    out.push_str("+\n");
    for row in &grid {
        out.push('|');
        out.extend(row.iter());
        out.push_str("|\n");
    }
    out.push('+');
    out.push_str(&"-".repeat(width));
    out.push_str("+\n");

    if points.is_empty() {
        out.push_str("no active theft reports\n");
    } else {
        for (index, point) in points.iter().enumerate() {
            out.push_str(&format!("  {} {}\n", (index + 1) % 10, point.plate));
        }
    }
    out
}

/// Render the full record set as a table of plate, status, and report date.
#[must_use]
pub fn render_table(records: &[IncidentRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<10} {:<10} {}\n",
        "PLATE", "STATUS", "REPORTED"
    ));
    for record in records {
        out.push_str(&format!(
            "{:<10} {:<10} {}\n",
            record.plate,
            record.status.to_string(),
            record.theft_date.format("%Y-%m-%d %H:%M")
        ));
    }
    out
}

/// Map a 0..=100 percentage onto a grid index.
fn percent_to_cell(percent: f64, cells: usize) -> usize {
    let clamped = percent.clamp(0.0, 100.0);
    let max_index = cells - 1;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = ((clamped / 100.0) * max_index as f64).round() as usize;
    index.min(max_index)
}
