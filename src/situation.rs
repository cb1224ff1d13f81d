//! Situation derivation: vessel and trip state in, one situation out.
//!
//! A strict decision table. Rules are tried top to bottom and the first
//! match wins, so no state is ever ambiguous:
//!
//! 1. no trip → preparing
//! 2. trip preparing/started map directly, completed counts as no trip
//! 3. emergency
//! 4. severe weather
//! 5. dangers in sight
//! 6. harbour, anchorage, buoy field
//! 7. approach
//! 8. zone × propulsion (× strong wind when sailing)
//! 9. unset zone falls back to coastal

use crate::model::{Emergency, NavZone, Situation, SevereWeather, Trip, TripStatus, VesselState};

/// Derives the current situation. Pure and total.
///
/// `trip` is the vessel's active trip, if any. A trip whose id does not
/// match `state.active_trip` is treated as absent.
pub fn derive(state: &VesselState, trip: Option<&Trip>) -> Situation {
    let Some(trip) = trip.filter(|t| state.active_trip == Some(t.id)) else {
        return Situation::PreparingTrip;
    };

    match trip.status {
        TripStatus::Preparing | TripStatus::Completed { .. } => return Situation::PreparingTrip,
        TripStatus::Started => return Situation::TripStarted,
        TripStatus::Underway | TripStatus::Interrupted => {}
    }

    if let Some(emergency) = state.emergency {
        return match emergency {
            Emergency::ManOverboard => Situation::ManOverboard,
            Emergency::Fire => Situation::Fire,
            Emergency::Medical => Situation::Medical,
            Emergency::Other => Situation::OtherEmergency,
        };
    }

    if state.severe_weather != SevereWeather::None {
        return Situation::StormManoeuvre;
    }

    if !state.dangers.is_empty() {
        return if state.is_strong_wind() {
            Situation::DangerSpottedStrongWind
        } else {
            Situation::DangerSpotted
        };
    }

    match state.nav_zone {
        NavZone::Harbour | NavZone::Anchorage | NavZone::BuoyField => {
            if state.nav_status.is_stopped() {
                Situation::HarbourStopped
            } else {
                Situation::HarbourManoeuvring
            }
        }
        NavZone::Approach => {
            if state.is_sailing() {
                Situation::ApproachSail
            } else {
                Situation::ApproachMotor
            }
        }
        zone if !state.is_sailing() => motor_situation(zone),
        zone if state.is_strong_wind() => strong_wind_situation(zone),
        zone => sail_situation(zone),
    }
}

fn motor_situation(zone: NavZone) -> Situation {
    match zone {
        NavZone::Protected => Situation::ProtectedMotor,
        NavZone::Waterway => Situation::WaterwayMotor,
        NavZone::OpenSea => Situation::OpenSeaMotor,
        NavZone::TrafficLane => Situation::TrafficLaneMotor,
        _ => Situation::CoastalMotor,
    }
}

fn sail_situation(zone: NavZone) -> Situation {
    match zone {
        NavZone::Protected => Situation::ProtectedSail,
        NavZone::Waterway => Situation::WaterwaySail,
        NavZone::OpenSea => Situation::OpenSeaSail,
        NavZone::TrafficLane => Situation::TrafficLaneSail,
        _ => Situation::CoastalSail,
    }
}

fn strong_wind_situation(zone: NavZone) -> Situation {
    match zone {
        NavZone::Protected => Situation::ProtectedSailStrongWind,
        NavZone::Waterway => Situation::WaterwaySailStrongWind,
        NavZone::OpenSea => Situation::OpenSeaSailStrongWind,
        NavZone::TrafficLane => Situation::TrafficLaneSailStrongWind,
        _ => Situation::CoastalSailStrongWind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    use crate::model::{Danger, NavStatus, Propulsion};

    fn underway() -> (VesselState, Trip) {
        let mut trip = Trip::new("Test");
        trip.status = TripStatus::Underway;
        let state = VesselState {
            active_trip: Some(trip.id),
            nav_status: NavStatus::Underway,
            ..VesselState::default()
        };
        (state, trip)
    }

    #[test]
    fn no_trip_is_preparing() {
        assert_eq!(
            derive(&VesselState::default(), None),
            Situation::PreparingTrip
        );
    }

    #[test]
    fn foreign_trip_is_ignored() {
        let (state, _) = underway();
        let mut other = Trip::new("Other");
        other.status = TripStatus::Underway;
        assert_eq!(derive(&state, Some(&other)), Situation::PreparingTrip);
    }

    #[test]
    fn trip_status_maps_directly() {
        let (state, mut trip) = underway();

        trip.status = TripStatus::Preparing;
        assert_eq!(derive(&state, Some(&trip)), Situation::PreparingTrip);

        trip.status = TripStatus::Started;
        assert_eq!(derive(&state, Some(&trip)), Situation::TripStarted);

        trip.status = TripStatus::Completed {
            completed_at: Timestamp::now(),
        };
        assert_eq!(derive(&state, Some(&trip)), Situation::PreparingTrip);
    }

    #[test]
    fn emergency_beats_storm() {
        let (mut state, trip) = underway();
        state.emergency = Some(Emergency::ManOverboard);
        state.severe_weather = SevereWeather::Storm;
        state.dangers = vec![Danger::Traffic];

        assert_eq!(derive(&state, Some(&trip)), Situation::ManOverboard);

        state.emergency = Some(Emergency::Fire);
        assert_eq!(derive(&state, Some(&trip)), Situation::Fire);
    }

    #[test]
    fn storm_beats_danger_and_zone() {
        let (mut state, trip) = underway();
        state.severe_weather = SevereWeather::Gale;
        state.dangers = vec![Danger::Shallows];
        state.nav_zone = NavZone::Harbour;

        assert_eq!(derive(&state, Some(&trip)), Situation::StormManoeuvre);
    }

    #[test]
    fn danger_splits_on_wind_strength() {
        let (mut state, trip) = underway();
        state.dangers = vec![Danger::Fog];
        state.beaufort = 4;
        assert_eq!(derive(&state, Some(&trip)), Situation::DangerSpotted);

        state.beaufort = 5;
        assert_eq!(
            derive(&state, Some(&trip)),
            Situation::DangerSpottedStrongWind
        );
    }

    #[test]
    fn harbour_splits_on_stopped() {
        let (mut state, trip) = underway();
        state.nav_zone = NavZone::BuoyField;
        state.nav_status = NavStatus::Moored;
        assert_eq!(derive(&state, Some(&trip)), Situation::HarbourStopped);

        state.nav_status = NavStatus::Manoeuvring;
        assert_eq!(derive(&state, Some(&trip)), Situation::HarbourManoeuvring);
    }

    #[test]
    fn approach_splits_on_propulsion() {
        let (mut state, trip) = underway();
        state.nav_zone = NavZone::Approach;
        state.propulsion = Propulsion::None;
        assert_eq!(derive(&state, Some(&trip)), Situation::ApproachMotor);

        state.propulsion = Propulsion::MotorSail;
        assert_eq!(derive(&state, Some(&trip)), Situation::ApproachSail);
    }

    #[test]
    fn zone_crossed_with_propulsion_and_wind() {
        let (mut state, trip) = underway();
        state.nav_zone = NavZone::OpenSea;

        state.propulsion = Propulsion::Motor;
        state.beaufort = 7;
        assert_eq!(derive(&state, Some(&trip)), Situation::OpenSeaMotor);

        state.propulsion = Propulsion::Sail;
        state.beaufort = 3;
        assert_eq!(derive(&state, Some(&trip)), Situation::OpenSeaSail);

        state.beaufort = 6;
        assert_eq!(
            derive(&state, Some(&trip)),
            Situation::OpenSeaSailStrongWind
        );
    }

    #[test]
    fn unset_zone_falls_back_to_coastal() {
        let (mut state, trip) = underway();
        state.nav_zone = NavZone::Unset;

        state.propulsion = Propulsion::Motor;
        assert_eq!(derive(&state, Some(&trip)), Situation::CoastalMotor);

        state.propulsion = Propulsion::Sail;
        assert_eq!(derive(&state, Some(&trip)), Situation::CoastalSail);

        state.beaufort = 8;
        assert_eq!(
            derive(&state, Some(&trip)),
            Situation::CoastalSailStrongWind
        );
    }

    #[test]
    fn interrupted_trip_uses_navigation_rules() {
        let (mut state, mut trip) = underway();
        trip.status = TripStatus::Interrupted;
        state.nav_zone = NavZone::Anchorage;
        state.nav_status = NavStatus::AtAnchor;

        assert_eq!(derive(&state, Some(&trip)), Situation::HarbourStopped);
    }

    #[test]
    fn derivation_is_repeatable() {
        let (mut state, trip) = underway();
        state.nav_zone = NavZone::TrafficLane;
        state.propulsion = Propulsion::Sail;
        state.beaufort = 5;

        let first = derive(&state, Some(&trip));
        for _ in 0..10 {
            assert_eq!(derive(&state, Some(&trip)), first);
        }
    }
}
