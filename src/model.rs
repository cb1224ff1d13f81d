//! Core data model for shiplog.
//!
//! These types describe the vessel and its paper trail:
//! the live vessel state, trips, log entries, position fixes,
//! sensor snapshots, and the derived situation.

mod fix;
mod log_entry;
mod sensor;
mod situation;
mod trip;
mod vessel;

pub use fix::{Coordinate, Fix, FixSource};
pub use log_entry::{LogEntry, NavSnapshot};
pub use sensor::SensorSnapshot;
pub use situation::Situation;
pub use trip::{Trip, TripStatus};
pub use vessel::{
    Autopilot, Danger, Emergency, NavStatus, NavZone, PointOfSail, Propulsion, Sail,
    SailReduction, SevereWeather, Tack, VesselState,
};
