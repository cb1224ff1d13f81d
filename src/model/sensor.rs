//! Sensor snapshot: the latest readings from the external instrument feed.

use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::geo;

use super::{Coordinate, Fix, FixSource};

/// The most recent readings from the instrument bus.
///
/// Every reading is optional. A feed that is entirely absent is a valid
/// state and means "no authoritative data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSnapshot {
    /// When the snapshot was last refreshed.
    pub received_at: Option<Timestamp>,

    pub position: Option<Coordinate>,

    /// Speed over ground, knots.
    pub sog: Option<f64>,

    /// Course over ground, degrees.
    pub cog: Option<f64>,

    /// Magnetic heading, degrees.
    pub heading: Option<f64>,

    /// Speed through water, knots.
    pub stw: Option<f64>,

    pub aws: Option<f64>,
    pub awa: Option<f64>,
    pub tws: Option<f64>,
    pub twa: Option<f64>,
    pub twd: Option<f64>,
}

impl SensorSnapshot {
    /// Whether the snapshot was refreshed within `window` of `now`.
    ///
    /// A snapshot stamped in the future counts as fresh.
    pub fn is_fresh(&self, now: Timestamp, window: Duration) -> bool {
        let Some(received_at) = self.received_at else {
            return false;
        };
        let age = now.as_millisecond() - received_at.as_millisecond();
        u64::try_from(age).map_or(true, |age| u128::from(age) <= window.as_millis())
    }

    /// The snapshot's position as a fix, if it has a usable one.
    pub fn fix(&self) -> Option<Fix> {
        let at = self.received_at?;
        let coordinate = self
            .position
            .filter(|c| on_the_globe(c) && !c.is_trivial())?;
        Some(Fix::new(at, coordinate, FixSource::Sensor))
    }

    /// The readings with garbage dropped: non-finite values and negative
    /// speeds go, angles are wrapped into `[0, 360)`.
    pub fn sanitized(self) -> Self {
        Self {
            received_at: self.received_at,
            position: self.position.filter(on_the_globe),
            sog: speed(self.sog),
            cog: angle(self.cog),
            heading: angle(self.heading),
            stw: speed(self.stw),
            aws: speed(self.aws),
            awa: angle(self.awa),
            tws: speed(self.tws),
            twa: angle(self.twa),
            twd: angle(self.twd),
        }
    }
}

fn on_the_globe(c: &Coordinate) -> bool {
    (-90.0..=90.0).contains(&c.lat) && (-180.0..=180.0).contains(&c.lon)
}

fn speed(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

fn angle(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite()).map(geo::normalize_deg)
}
