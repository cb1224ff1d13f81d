//! Navigation field derivation.
//!
//! Per field, the first source that has a value wins:
//!
//! 1. a fresh sensor reading,
//! 2. the run's vector (speed and course only),
//! 3. whatever the vessel state already holds,
//! 4. a domain default.
//!
//! Defaults only ever fill a field that is still unset.

use strum::{EnumIter, IntoEnumIterator};

use crate::geo::{self, Leg};
use crate::model::{PointOfSail, SensorSnapshot, Tack, VesselState};

use super::validate::STATIONARY_KN;

/// Wind speed in knots at the low end of each Beaufort force, 0 through 12.
pub const BEAUFORT_KNOTS: [f64; 13] = [
    0.0, 1.0, 4.0, 7.0, 11.0, 17.0, 22.0, 28.0, 34.0, 41.0, 48.0, 56.0, 64.0,
];

pub fn beaufort_to_knots(force: u8) -> f64 {
    BEAUFORT_KNOTS[usize::from(force.min(12))]
}

/// Apparent wind angle off the bow, clockwise, for a point of sail on a tack.
pub fn default_awa(point_of_sail: PointOfSail, tack: Tack) -> f64 {
    let angle = point_of_sail.apparent_wind_angle();
    match tack {
        Tack::Starboard => angle,
        Tack::Port => geo::normalize_deg(360.0 - angle),
    }
}

/// The navigation and wind readings a run settles on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NavFields {
    pub sog: Option<f64>,
    pub cog: Option<f64>,
    pub heading: Option<f64>,
    pub stw: Option<f64>,
    pub aws: Option<f64>,
    pub awa: Option<f64>,
    pub tws: Option<f64>,
    pub twa: Option<f64>,
    pub twd: Option<f64>,
}

impl From<&VesselState> for NavFields {
    fn from(v: &VesselState) -> Self {
        Self {
            sog: v.sog,
            cog: v.cog,
            heading: v.heading,
            stw: v.stw,
            aws: v.aws,
            awa: v.awa,
            tws: v.tws,
            twa: v.twa,
            twd: v.twd,
        }
    }
}

/// One derivable field, for iterating and labelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum NavField {
    Sog,
    Cog,
    Heading,
    Stw,
    Aws,
    Awa,
    Tws,
    Twa,
    Twd,
}

impl NavField {
    /// Queue key for the field's mutation.
    pub fn key(self) -> &'static str {
        match self {
            Self::Sog => "nav.sog",
            Self::Cog => "nav.cog",
            Self::Heading => "nav.heading",
            Self::Stw => "nav.stw",
            Self::Aws => "wind.aws",
            Self::Awa => "wind.awa",
            Self::Tws => "wind.tws",
            Self::Twa => "wind.twa",
            Self::Twd => "wind.twd",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Sog => "SOG",
            Self::Cog => "COG",
            Self::Heading => "HDG",
            Self::Stw => "STW",
            Self::Aws => "AWS",
            Self::Awa => "AWA",
            Self::Tws => "TWS",
            Self::Twa => "TWA",
            Self::Twd => "TWD",
        }
    }

    fn is_speed(self) -> bool {
        matches!(self, Self::Sog | Self::Stw | Self::Aws | Self::Tws)
    }

    pub fn get(self, f: &NavFields) -> Option<f64> {
        match self {
            Self::Sog => f.sog,
            Self::Cog => f.cog,
            Self::Heading => f.heading,
            Self::Stw => f.stw,
            Self::Aws => f.aws,
            Self::Awa => f.awa,
            Self::Tws => f.tws,
            Self::Twa => f.twa,
            Self::Twd => f.twd,
        }
    }

    pub fn set(self, v: &mut VesselState, value: f64) {
        let slot = match self {
            Self::Sog => &mut v.sog,
            Self::Cog => &mut v.cog,
            Self::Heading => &mut v.heading,
            Self::Stw => &mut v.stw,
            Self::Aws => &mut v.aws,
            Self::Awa => &mut v.awa,
            Self::Tws => &mut v.tws,
            Self::Twa => &mut v.twa,
            Self::Twd => &mut v.twd,
        };
        *slot = Some(value);
    }

    /// `"SOG 5.2 kn"`, `"COG 093°"`.
    pub fn describe(self, value: f64) -> String {
        if self.is_speed() {
            format!("{} {value:.1} kn", self.label())
        } else {
            format!("{} {:03.0}°", self.label(), geo::normalize_deg(value))
        }
    }
}

/// The fields that changed between `before` and `after`, in display order.
pub fn changed(before: &NavFields, after: &NavFields) -> Vec<(NavField, f64)> {
    NavField::iter()
        .filter_map(|field| match (field.get(before), field.get(after)) {
            (old, Some(new)) if old != Some(new) => Some((field, new)),
            _ => None,
        })
        .collect()
}

/// Settles every field for this run.
///
/// `sensor` must already be known fresh. `vector` is the leg the run
/// trusts: P1→P2, or last-log→P1 when that was flagged.
pub fn derive_fields(
    vessel: &VesselState,
    sensor: Option<&SensorSnapshot>,
    vector: Option<&Leg>,
) -> NavFields {
    let mut f = NavFields::from(vessel);

    if let Some(leg) = vector {
        f.sog = Some(leg.speed_kn);
        if leg.speed_kn >= STATIONARY_KN {
            f.cog = Some(leg.bearing_deg);
        }
    }

    if let Some(s) = sensor {
        f.sog = s.sog.or(f.sog);
        f.cog = s.cog.or(f.cog);
        f.heading = s.heading.or(f.heading);
        f.stw = s.stw.or(f.stw);
        f.aws = s.aws.or(f.aws);
        f.awa = s.awa.or(f.awa);
        f.tws = s.tws.or(f.tws);
        f.twa = s.twa.or(f.twa);
        f.twd = s.twd.or(f.twd);
    }

    f.stw = f.stw.or(f.sog);
    f.heading = f.heading.or(f.cog);
    f.awa = f
        .awa
        .or_else(|| Some(default_awa(vessel.point_of_sail, vessel.tack)));
    f.tws = f.tws.or_else(|| Some(beaufort_to_knots(vessel.beaufort)));
    f
}
