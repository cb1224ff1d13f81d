//! Per-situation action lists.
//!
//! Hand-curated. Order is the order actions are offered in. Tags that are
//! also on the global bar may appear here; the catalog filters them out.

use crate::model::Situation;

#[allow(clippy::enum_glob_use)]
use super::ActionKind::{self, *};

/// Always offered, whatever the situation.
pub(super) const GLOBAL_BAR: &[ActionKind] = &[
    ReportDanger,
    MotorStart,
    MotorStop,
    ReportFailure,
    ManualLog,
    EditSettings,
    LogPosition,
    NavigateWaypoint,
    DeclareStorm,
    ManOverboard,
    Fire,
    Medical,
    OtherEmergency,
];

const PREPARING_TRIP: &[ActionKind] = &[StartTrip, EndTrip, LogWeather, ChangeWatch];

const TRIP_STARTED: &[ActionKind] = &[CastOff, MotorStart, LogWeather, ChangeWatch, EndTrip];

const MAN_OVERBOARD: &[ActionKind] = &[LogPosition, MotorStart, TakeInSails, EndEmergency];

const FIRE: &[ActionKind] = &[MotorStop, LogPosition, EndEmergency];

const MEDICAL: &[ActionKind] = &[LogPosition, ChangeCourse, EndEmergency];

const OTHER_EMERGENCY: &[ActionKind] = &[LogPosition, ReportFailure, EndEmergency];

const STORM_MANOEUVRE: &[ActionKind] = &[
    Reef,
    TakeInSails,
    MotorStart,
    ChangeCourse,
    LogWeather,
    ClearStorm,
];

const DANGER_SPOTTED: &[ActionKind] = &[ChangeCourse, MotorStart, ClearDanger, LogWeather];

const DANGER_SPOTTED_STRONG_WIND: &[ActionKind] = &[
    Reef,
    ChangeCourse,
    MotorStart,
    ClearDanger,
    LogWeather,
];

const HARBOUR_STOPPED: &[ActionKind] = &[
    CastOff,
    InterruptTrip,
    ResumeTrip,
    WeighAnchor,
    Moor,
    DropAnchor,
    LogWeather,
    ChangeWatch,
    EndTrip,
];

const HARBOUR_MANOEUVRING: &[ActionKind] = &[
    Moor,
    DropAnchor,
    ChangeZone,
    TakeInSails,
    ChangeCourse,
];

const APPROACH_MOTOR: &[ActionKind] = &[
    ChangeZone,
    ChangeCourse,
    DropAnchor,
    Moor,
    AutopilotOff,
    ResumeTrip,
];

const APPROACH_SAIL: &[ActionKind] = &[
    TakeInSails,
    Reef,
    ChangeZone,
    ChangeCourse,
    DropAnchor,
    AutopilotOff,
    ResumeTrip,
];

const MOTOR_UNDERWAY: &[ActionKind] = &[
    ChangeCourse,
    SetSails,
    AutopilotOn,
    AutopilotOff,
    ChangeZone,
    LogWeather,
    ChangeWatch,
    DropAnchor,
    InterruptTrip,
    ResumeTrip,
];

const TRAFFIC_LANE_MOTOR: &[ActionKind] = &[
    ChangeCourse,
    AutopilotOff,
    AutopilotOn,
    ChangeZone,
    LogWeather,
    ChangeWatch,
    ResumeTrip,
];

const SAIL_UNDERWAY: &[ActionKind] = &[
    Tack,
    Jibe,
    ChangeCourse,
    Reef,
    ShakeOutReef,
    SetSails,
    TakeInSails,
    AutopilotOn,
    AutopilotOff,
    ChangeZone,
    LogWeather,
    ChangeWatch,
    DropAnchor,
    InterruptTrip,
    ResumeTrip,
];

const TRAFFIC_LANE_SAIL: &[ActionKind] = &[
    ChangeCourse,
    Tack,
    Jibe,
    AutopilotOff,
    Reef,
    ShakeOutReef,
    ChangeZone,
    LogWeather,
    ChangeWatch,
    ResumeTrip,
];

const SAIL_STRONG_WIND: &[ActionKind] = &[
    Reef,
    ShakeOutReef,
    TakeInSails,
    Tack,
    Jibe,
    ChangeCourse,
    AutopilotOn,
    AutopilotOff,
    ChangeZone,
    LogWeather,
    ChangeWatch,
    InterruptTrip,
    ResumeTrip,
];

const TRAFFIC_LANE_SAIL_STRONG_WIND: &[ActionKind] = &[
    Reef,
    ShakeOutReef,
    TakeInSails,
    ChangeCourse,
    Tack,
    Jibe,
    AutopilotOff,
    ChangeZone,
    LogWeather,
    ResumeTrip,
];

/// The ordered action list for a situation.
pub(super) fn tags_for(situation: Situation) -> &'static [ActionKind] {
    match situation {
        Situation::PreparingTrip => PREPARING_TRIP,
        Situation::TripStarted => TRIP_STARTED,
        Situation::ManOverboard => MAN_OVERBOARD,
        Situation::Fire => FIRE,
        Situation::Medical => MEDICAL,
        Situation::OtherEmergency => OTHER_EMERGENCY,
        Situation::StormManoeuvre => STORM_MANOEUVRE,
        Situation::DangerSpotted => DANGER_SPOTTED,
        Situation::DangerSpottedStrongWind => DANGER_SPOTTED_STRONG_WIND,
        Situation::HarbourStopped => HARBOUR_STOPPED,
        Situation::HarbourManoeuvring => HARBOUR_MANOEUVRING,
        Situation::ApproachMotor => APPROACH_MOTOR,
        Situation::ApproachSail => APPROACH_SAIL,
        Situation::CoastalMotor
        | Situation::ProtectedMotor
        | Situation::WaterwayMotor
        | Situation::OpenSeaMotor => MOTOR_UNDERWAY,
        Situation::TrafficLaneMotor => TRAFFIC_LANE_MOTOR,
        Situation::CoastalSail
        | Situation::ProtectedSail
        | Situation::WaterwaySail
        | Situation::OpenSeaSail => SAIL_UNDERWAY,
        Situation::TrafficLaneSail => TRAFFIC_LANE_SAIL,
        Situation::CoastalSailStrongWind
        | Situation::ProtectedSailStrongWind
        | Situation::WaterwaySailStrongWind
        | Situation::OpenSeaSailStrongWind => SAIL_STRONG_WIND,
        Situation::TrafficLaneSailStrongWind => TRAFFIC_LANE_SAIL_STRONG_WIND,
    }
}
