//! Log entries: the append-only record of the trip.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    Autopilot, Coordinate, Danger, Emergency, NavStatus, NavZone, PointOfSail, Propulsion,
    SevereWeather, Tack, VesselState,
};

/// One line in the logbook.
///
/// Created only by a queue flush. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub logged_at: Timestamp,
    pub position: Option<Coordinate>,
    /// Header plus the descriptions of every mutation folded into this entry.
    pub text: String,
    pub snapshot: NavSnapshot,
}

/// The navigation, weather, and sailing fields copied out of the vessel
/// state at the moment of logging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavSnapshot {
    pub sog: Option<f64>,
    pub cog: Option<f64>,
    pub heading: Option<f64>,
    pub stw: Option<f64>,
    pub aws: Option<f64>,
    pub awa: Option<f64>,
    pub tws: Option<f64>,
    pub twa: Option<f64>,
    pub twd: Option<f64>,
    pub beaufort: u8,
    pub propulsion: Propulsion,
    pub nav_status: NavStatus,
    pub nav_zone: NavZone,
    pub autopilot: Autopilot,
    pub tack: Tack,
    pub point_of_sail: PointOfSail,
    pub emergency: Option<Emergency>,
    pub severe_weather: SevereWeather,
    pub dangers: Vec<Danger>,
}

impl From<&VesselState> for NavSnapshot {
    fn from(state: &VesselState) -> Self {
        Self {
            sog: state.sog,
            cog: state.cog,
            heading: state.heading,
            stw: state.stw,
            aws: state.aws,
            awa: state.awa,
            tws: state.tws,
            twa: state.twa,
            twd: state.twd,
            beaufort: state.beaufort,
            propulsion: state.propulsion,
            nav_status: state.nav_status,
            nav_zone: state.nav_zone,
            autopilot: state.autopilot,
            tack: state.tack,
            point_of_sail: state.point_of_sail,
            emergency: state.emergency,
            severe_weather: state.severe_weather,
            dangers: state.dangers.clone(),
        }
    }
}
