//! Vessel state: the single live snapshot of the boat.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use super::Coordinate;

/// The live snapshot of the vessel.
///
/// There is exactly one per vessel context. It is never historical:
/// log entries copy what they need out of it at commit time.
/// `version` is bumped on every commit so callers can tell a stale copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VesselState {
    pub version: u64,

    pub position: Option<Coordinate>,
    pub position_at: Option<Timestamp>,

    /// Speed over ground, knots.
    pub sog: Option<f64>,
    /// Course over ground, degrees true.
    pub cog: Option<f64>,
    /// Magnetic heading, degrees.
    pub heading: Option<f64>,
    /// Speed through water, knots.
    pub stw: Option<f64>,

    /// Apparent wind speed, knots.
    pub aws: Option<f64>,
    /// Apparent wind angle, degrees off the bow (0–360, clockwise).
    pub awa: Option<f64>,
    /// True wind speed, knots.
    pub tws: Option<f64>,
    /// True wind angle, degrees off the bow.
    pub twa: Option<f64>,
    /// True wind direction, degrees.
    pub twd: Option<f64>,
    /// Observed wind force on the Beaufort scale (0–12).
    pub beaufort: u8,

    pub propulsion: Propulsion,
    pub nav_status: NavStatus,
    pub nav_zone: NavZone,
    pub autopilot: Autopilot,
    pub tack: Tack,
    pub point_of_sail: PointOfSail,
    pub sails: Vec<Sail>,

    pub active_trip: Option<Uuid>,

    pub emergency: Option<Emergency>,
    pub severe_weather: SevereWeather,
    /// Dangers currently in sight. Empty means none.
    pub dangers: Vec<Danger>,
    /// Last reported equipment failure.
    pub failure: Option<String>,
}

impl VesselState {
    /// Wind force above 4 Bft switches to the strong-wind situations.
    pub const STRONG_WIND_BEAUFORT: u8 = 4;

    pub fn is_strong_wind(&self) -> bool {
        self.beaufort > Self::STRONG_WIND_BEAUFORT
    }

    pub fn is_sailing(&self) -> bool {
        self.propulsion.is_sailing()
    }

    pub fn engine_running(&self) -> bool {
        matches!(self.propulsion, Propulsion::Motor | Propulsion::MotorSail)
    }

    pub fn sail(&self, name: &str) -> Option<&Sail> {
        self.sails.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn sail_mut(&mut self, name: &str) -> Option<&mut Sail> {
        self.sails
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Recomputes propulsion from the engine and the sails that are set.
    pub fn settle_propulsion(&mut self, engine: bool) {
        let any_sail = self.sails.iter().any(|s| s.set);
        self.propulsion = match (engine, any_sail) {
            (true, true) => Propulsion::MotorSail,
            (true, false) => Propulsion::Motor,
            (false, true) => Propulsion::Sail,
            (false, false) => Propulsion::None,
        };
    }
}

/// How the vessel is currently driven.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Propulsion {
    #[default]
    None,
    Motor,
    Sail,
    MotorSail,
}

impl Propulsion {
    /// Sail and motor-sail count as sailing; motor and none do not.
    pub fn is_sailing(self) -> bool {
        matches!(self, Self::Sail | Self::MotorSail)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NavStatus {
    Underway,
    Manoeuvring,
    Stopped,
    #[default]
    Moored,
    AtAnchor,
}

impl NavStatus {
    /// Not making way: stopped, moored, or at anchor.
    pub fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped | Self::Moored | Self::AtAnchor)
    }
}

/// The kind of water the vessel is in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NavZone {
    #[default]
    Unset,
    Harbour,
    Anchorage,
    BuoyField,
    Approach,
    Coastal,
    Protected,
    Waterway,
    OpenSea,
    TrafficLane,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Autopilot {
    #[default]
    Off,
    Compass,
    Wind,
    Track,
}

/// The side the wind comes from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Tack {
    Port,
    #[default]
    Starboard,
}

impl Tack {
    pub fn flipped(self) -> Self {
        match self {
            Self::Port => Self::Starboard,
            Self::Starboard => Self::Port,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PointOfSail {
    CloseHauled,
    CloseReach,
    #[default]
    BeamReach,
    BroadReach,
    Running,
}

impl PointOfSail {
    /// Typical apparent wind angle off the bow for this point of sail,
    /// measured on the starboard side.
    pub fn apparent_wind_angle(self) -> f64 {
        match self {
            Self::CloseHauled => 35.0,
            Self::CloseReach => 60.0,
            Self::BeamReach => 90.0,
            Self::BroadReach => 135.0,
            Self::Running => 180.0,
        }
    }
}

/// A sail in the wardrobe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sail {
    pub name: String,
    pub set: bool,
    pub reduction: SailReduction,
    /// Reef points available. Zero means the sail is furled, not reefed.
    pub max_reefs: u8,
}

impl Sail {
    pub fn new(name: impl Into<String>, max_reefs: u8) -> Self {
        Self {
            name: name.into(),
            set: false,
            reduction: SailReduction::None,
            max_reefs,
        }
    }

    /// Whether one more step of reduction is possible.
    pub fn can_reduce(&self) -> bool {
        self.set
            && match self.reduction {
                SailReduction::None => true,
                SailReduction::Reefed(n) => n < self.max_reefs,
                SailReduction::Furled(percent) => percent < 100,
            }
    }

    /// Whether one step of reduction can be shaken out.
    pub fn can_shake_out(&self) -> bool {
        self.set && !matches!(self.reduction, SailReduction::None)
    }

    /// Takes in one reef, or rolls away another quarter.
    pub fn reduce(&mut self) {
        self.reduction = match self.reduction {
            SailReduction::None if self.max_reefs > 0 => SailReduction::Reefed(1),
            SailReduction::None => SailReduction::Furled(25),
            SailReduction::Reefed(n) => SailReduction::Reefed((n + 1).min(self.max_reefs)),
            SailReduction::Furled(p) => SailReduction::Furled((p + 25).min(100)),
        };
    }

    /// Shakes out one reef, or unrolls a quarter.
    pub fn shake_out(&mut self) {
        self.reduction = match self.reduction {
            SailReduction::None | SailReduction::Reefed(0 | 1) => SailReduction::None,
            SailReduction::Reefed(n) => SailReduction::Reefed(n - 1),
            SailReduction::Furled(p) if p <= 25 => SailReduction::None,
            SailReduction::Furled(p) => SailReduction::Furled(p - 25),
        };
    }
}

/// How far a sail has been shortened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "camelCase")]
pub enum SailReduction {
    #[default]
    None,
    /// Number of reefs taken in.
    Reefed(u8),
    /// Percentage rolled away.
    Furled(u8),
}

impl fmt::Display for SailReduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("full"),
            Self::Reefed(1) => f.write_str("1 reef"),
            Self::Reefed(n) => write!(f, "{n} reefs"),
            Self::Furled(p) => write!(f, "{p}% furled"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Emergency {
    ManOverboard,
    Fire,
    Medical,
    Other,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SevereWeather {
    #[default]
    None,
    Gale,
    Storm,
    Thunderstorm,
    Squall,
}

/// Something in the environment worth steering clear of.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Danger {
    Shallows,
    Traffic,
    Debris,
    Fog,
    FishingGear,
    Ice,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainsail_reefs_to_its_limit() {
        let mut main = Sail::new("main", 2);
        main.set = true;

        main.reduce();
        main.reduce();
        assert_eq!(main.reduction, SailReduction::Reefed(2));
        assert!(!main.can_reduce());
        assert!(main.can_shake_out());

        main.shake_out();
        main.shake_out();
        assert_eq!(main.reduction, SailReduction::None);
        assert!(!main.can_shake_out());
    }

    #[test]
    fn genoa_furls_in_quarters() {
        let mut genoa = Sail::new("genoa", 0);
        genoa.set = true;

        genoa.reduce();
        assert_eq!(genoa.reduction, SailReduction::Furled(25));
        genoa.shake_out();
        assert_eq!(genoa.reduction, SailReduction::None);
    }

    #[test]
    fn sails_not_set_cannot_be_reefed() {
        let main = Sail::new("main", 3);
        assert!(!main.can_reduce());
        assert!(!main.can_shake_out());
    }

    #[test]
    fn propulsion_follows_engine_and_sails() {
        let mut state = VesselState {
            sails: vec![Sail::new("main", 2)],
            ..VesselState::default()
        };
        state.settle_propulsion(true);
        assert_eq!(state.propulsion, Propulsion::Motor);

        state.sails[0].set = true;
        state.settle_propulsion(true);
        assert_eq!(state.propulsion, Propulsion::MotorSail);

        state.settle_propulsion(false);
        assert_eq!(state.propulsion, Propulsion::Sail);
        assert!(state.is_sailing());
    }

    #[test]
    fn zones_parse_from_kebab_case() {
        assert_eq!("open-sea".parse::<NavZone>().unwrap(), NavZone::OpenSea);
        assert_eq!(NavZone::BuoyField.to_string(), "buoy-field");
    }
}
