//! Situation: what kind of moment this is.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// The derived operating context that drives which actions are offered.
///
/// Never stored. Recomputed on demand by [`crate::situation::derive`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Situation {
    PreparingTrip,
    TripStarted,

    ManOverboard,
    Fire,
    Medical,
    OtherEmergency,

    StormManoeuvre,

    DangerSpotted,
    DangerSpottedStrongWind,

    HarbourStopped,
    HarbourManoeuvring,

    ApproachMotor,
    ApproachSail,

    CoastalMotor,
    ProtectedMotor,
    WaterwayMotor,
    OpenSeaMotor,
    TrafficLaneMotor,

    CoastalSail,
    ProtectedSail,
    WaterwaySail,
    OpenSeaSail,
    TrafficLaneSail,

    CoastalSailStrongWind,
    ProtectedSailStrongWind,
    WaterwaySailStrongWind,
    OpenSeaSailStrongWind,
    TrafficLaneSailStrongWind,
}

impl Situation {
    pub fn is_emergency(self) -> bool {
        matches!(
            self,
            Self::ManOverboard | Self::Fire | Self::Medical | Self::OtherEmergency
        )
    }
}
