//! Fix: a single timestamped position reading.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// A fix at (0, 0) is what an uninitialized receiver reports.
    pub fn is_trivial(&self) -> bool {
        self.lat == 0.0 && self.lon == 0.0
    }
}

/// Degrees and decimal minutes: `54°18.000'N 010°06.000'E`.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat < 0.0 { 'S' } else { 'N' };
        let ew = if self.lon < 0.0 { 'W' } else { 'E' };
        let (lat_deg, lat_min) = degrees_minutes(self.lat.abs());
        let (lon_deg, lon_min) = degrees_minutes(self.lon.abs());
        write!(
            f,
            "{lat_deg:02}°{lat_min:06.3}'{ns} {lon_deg:03}°{lon_min:06.3}'{ew}"
        )
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn degrees_minutes(value: f64) -> (u32, f64) {
    let degrees = value.trunc();
    (degrees as u32, (value - degrees) * 60.0)
}

/// Where a fix came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FixSource {
    /// The external sensor feed (NMEA snapshot).
    Sensor,

    /// A one-shot request to the device's own receiver.
    Device,

    /// The vessel's last known position.
    LastKnown,
}

/// A single timestamped position reading.
///
/// Short-lived: produced and consumed within one reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub at: Timestamp,
    pub coordinate: Coordinate,
    pub source: FixSource,
}

impl Fix {
    pub fn new(at: Timestamp, coordinate: Coordinate, source: FixSource) -> Self {
        Self {
            at,
            coordinate,
            source,
        }
    }
}
