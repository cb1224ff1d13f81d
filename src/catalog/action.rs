//! Action kinds: every operator action the logbook knows about.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::model::{Autopilot, Emergency, NavStatus, SevereWeather, TripStatus};

use super::ActionContext;

/// Every action the operator can fire.
///
/// Each variant carries a stable tag (its `strum` serialization) that is
/// used on the command line and in stored preferences. Tags never change.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
pub enum ActionKind {
    #[strum(serialize = "trip.start")]
    StartTrip,
    #[strum(serialize = "trip.cast-off")]
    CastOff,
    #[strum(serialize = "trip.interrupt")]
    InterruptTrip,
    #[strum(serialize = "trip.resume")]
    ResumeTrip,
    #[strum(serialize = "trip.end")]
    EndTrip,

    #[strum(serialize = "motor.start")]
    MotorStart,
    #[strum(serialize = "motor.stop")]
    MotorStop,

    #[strum(serialize = "sails.set")]
    SetSails,
    #[strum(serialize = "sails.take-in")]
    TakeInSails,
    #[strum(serialize = "sails.reef")]
    Reef,
    #[strum(serialize = "sails.shake-out")]
    ShakeOutReef,

    #[strum(serialize = "manoeuvre.tack")]
    Tack,
    #[strum(serialize = "manoeuvre.jibe")]
    Jibe,
    #[strum(serialize = "manoeuvre.course")]
    ChangeCourse,

    #[strum(serialize = "mooring.moor")]
    Moor,
    #[strum(serialize = "anchor.drop")]
    DropAnchor,
    #[strum(serialize = "anchor.weigh")]
    WeighAnchor,

    #[strum(serialize = "autopilot.on")]
    AutopilotOn,
    #[strum(serialize = "autopilot.off")]
    AutopilotOff,

    #[strum(serialize = "nav.zone")]
    ChangeZone,
    #[strum(serialize = "nav.waypoint")]
    NavigateWaypoint,

    #[strum(serialize = "danger.report")]
    ReportDanger,
    #[strum(serialize = "danger.clear")]
    ClearDanger,

    #[strum(serialize = "storm.declare")]
    DeclareStorm,
    #[strum(serialize = "storm.clear")]
    ClearStorm,

    #[strum(serialize = "emergency.mob")]
    ManOverboard,
    #[strum(serialize = "emergency.fire")]
    Fire,
    #[strum(serialize = "emergency.medical")]
    Medical,
    #[strum(serialize = "emergency.other")]
    OtherEmergency,
    #[strum(serialize = "emergency.end")]
    EndEmergency,

    #[strum(serialize = "failure.report")]
    ReportFailure,
    #[strum(serialize = "log.manual")]
    ManualLog,
    #[strum(serialize = "log.position")]
    LogPosition,
    #[strum(serialize = "log.weather")]
    LogWeather,
    #[strum(serialize = "crew.watch")]
    ChangeWatch,

    #[strum(serialize = "settings.edit")]
    EditSettings,
}

/// Coarse grouping for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Category {
    Trip,
    Propulsion,
    Manoeuvre,
    Mooring,
    Navigation,
    Safety,
    Emergency,
    Log,
    Settings,
}

impl ActionKind {
    /// The stable tag.
    pub fn tag(self) -> &'static str {
        self.into()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::StartTrip => "Start trip",
            Self::CastOff => "Cast off",
            Self::InterruptTrip => "Interrupt trip",
            Self::ResumeTrip => "Resume trip",
            Self::EndTrip => "End trip",
            Self::MotorStart => "Start motor",
            Self::MotorStop => "Stop motor",
            Self::SetSails => "Set sails",
            Self::TakeInSails => "Take in sails",
            Self::Reef => "Reef",
            Self::ShakeOutReef => "Shake out reef",
            Self::Tack => "Tack",
            Self::Jibe => "Jibe",
            Self::ChangeCourse => "Change course",
            Self::Moor => "Moor",
            Self::DropAnchor => "Drop anchor",
            Self::WeighAnchor => "Weigh anchor",
            Self::AutopilotOn => "Autopilot on",
            Self::AutopilotOff => "Autopilot off",
            Self::ChangeZone => "Change nav zone",
            Self::NavigateWaypoint => "Navigate to waypoint",
            Self::ReportDanger => "Report danger",
            Self::ClearDanger => "Danger cleared",
            Self::DeclareStorm => "Severe weather",
            Self::ClearStorm => "Weather eased",
            Self::ManOverboard => "Man overboard",
            Self::Fire => "Fire on board",
            Self::Medical => "Medical emergency",
            Self::OtherEmergency => "Other emergency",
            Self::EndEmergency => "End emergency",
            Self::ReportFailure => "Report failure",
            Self::ManualLog => "Manual log",
            Self::LogPosition => "Log position",
            Self::LogWeather => "Log weather",
            Self::ChangeWatch => "Watch change",
            Self::EditSettings => "Settings",
        }
    }

    /// Icon name for the UI layer.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::StartTrip | Self::ResumeTrip => "play",
            Self::CastOff => "arrow-away",
            Self::InterruptTrip => "pause",
            Self::EndTrip => "flag-checkered",
            Self::MotorStart | Self::MotorStop => "engine",
            Self::SetSails | Self::TakeInSails => "sailboat",
            Self::Reef | Self::ShakeOutReef => "reef",
            Self::Tack | Self::Jibe => "arrows-turn",
            Self::ChangeCourse | Self::NavigateWaypoint => "compass",
            Self::Moor => "bollard",
            Self::DropAnchor | Self::WeighAnchor => "anchor",
            Self::AutopilotOn | Self::AutopilotOff => "steering-wheel",
            Self::ChangeZone => "map",
            Self::ReportDanger | Self::ClearDanger => "triangle-exclamation",
            Self::DeclareStorm | Self::ClearStorm | Self::LogWeather => "cloud-bolt",
            Self::ManOverboard => "life-ring",
            Self::Fire => "fire",
            Self::Medical => "kit-medical",
            Self::OtherEmergency | Self::EndEmergency => "siren",
            Self::ReportFailure => "wrench",
            Self::ManualLog => "pen",
            Self::LogPosition => "location-dot",
            Self::ChangeWatch => "users",
            Self::EditSettings => "gear",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Self::StartTrip
            | Self::CastOff
            | Self::InterruptTrip
            | Self::ResumeTrip
            | Self::EndTrip => Category::Trip,
            Self::MotorStart
            | Self::MotorStop
            | Self::SetSails
            | Self::TakeInSails
            | Self::Reef
            | Self::ShakeOutReef => Category::Propulsion,
            Self::Tack | Self::Jibe | Self::ChangeCourse | Self::AutopilotOn | Self::AutopilotOff => {
                Category::Manoeuvre
            }
            Self::Moor | Self::DropAnchor | Self::WeighAnchor => Category::Mooring,
            Self::ChangeZone | Self::NavigateWaypoint => Category::Navigation,
            Self::ReportDanger | Self::ClearDanger | Self::DeclareStorm | Self::ClearStorm => {
                Category::Safety
            }
            Self::ManOverboard
            | Self::Fire
            | Self::Medical
            | Self::OtherEmergency
            | Self::EndEmergency => Category::Emergency,
            Self::ReportFailure
            | Self::ManualLog
            | Self::LogPosition
            | Self::LogWeather
            | Self::ChangeWatch => Category::Log,
            Self::EditSettings => Category::Settings,
        }
    }

    /// Whether the action makes sense in the given context.
    ///
    /// Evaluated at query time against live state. Invisible actions are
    /// dropped from listings and refused by the runtime.
    pub fn is_visible(self, ctx: &ActionContext<'_>) -> bool {
        let state = ctx.state;
        let trip_status = ctx.trip.map(|t| t.status);
        match self {
            Self::StartTrip => trip_status == Some(TripStatus::Preparing),
            Self::CastOff => trip_status == Some(TripStatus::Started),
            Self::InterruptTrip => trip_status == Some(TripStatus::Underway),
            Self::ResumeTrip => trip_status == Some(TripStatus::Interrupted),
            Self::EndTrip => ctx.trip.is_some_and(crate::model::Trip::is_active),
            Self::MotorStart => !state.engine_running(),
            Self::MotorStop => state.engine_running(),
            Self::SetSails => state.sails.iter().any(|s| !s.set),
            Self::TakeInSails => state.sails.iter().any(|s| s.set),
            Self::Reef => state.sails.iter().any(crate::model::Sail::can_reduce),
            Self::ShakeOutReef => state.sails.iter().any(crate::model::Sail::can_shake_out),
            Self::Tack | Self::Jibe => state.is_sailing(),
            Self::Moor => state.nav_status != NavStatus::Moored,
            Self::DropAnchor => state.nav_status != NavStatus::AtAnchor,
            Self::WeighAnchor => state.nav_status == NavStatus::AtAnchor,
            Self::AutopilotOn => state.autopilot == Autopilot::Off,
            Self::AutopilotOff => state.autopilot != Autopilot::Off,
            Self::ClearDanger => !state.dangers.is_empty(),
            Self::DeclareStorm => state.severe_weather == SevereWeather::None,
            Self::ClearStorm => state.severe_weather != SevereWeather::None,
            Self::ManOverboard => state.emergency != Some(Emergency::ManOverboard),
            Self::Fire => state.emergency != Some(Emergency::Fire),
            Self::Medical => state.emergency != Some(Emergency::Medical),
            Self::OtherEmergency => state.emergency != Some(Emergency::Other),
            Self::EndEmergency => state.emergency.is_some(),
            Self::ChangeCourse
            | Self::ChangeZone
            | Self::NavigateWaypoint
            | Self::ReportDanger
            | Self::ReportFailure
            | Self::ManualLog
            | Self::LogPosition
            | Self::LogWeather
            | Self::ChangeWatch
            | Self::EditSettings => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    #[test]
    fn tags_are_unique_and_parse_back() {
        let mut seen = HashSet::new();
        for kind in ActionKind::iter() {
            assert!(seen.insert(kind.tag()), "duplicate tag {}", kind.tag());
            assert_eq!(kind.tag().parse::<ActionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_tag_does_not_parse() {
        assert!("sails.hoist-spinnaker".parse::<ActionKind>().is_err());
    }
}
