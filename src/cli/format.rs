//! Output formatting for CLI display.

use uuid::Uuid;

use crate::catalog::ActionDefinition;
use crate::model::{LogEntry, Trip, TripStatus, VesselState};

pub(super) fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// One line per entry: time, position, text.
pub(super) fn format_entry(entry: &LogEntry) -> String {
    let position = entry
        .position
        .map_or_else(|| "no position".to_string(), |p| p.to_string());
    format!(
        "{}  {position}  {}",
        entry.logged_at.strftime("%Y-%m-%d %H:%M"),
        entry.text
    )
}

pub(super) fn format_trip(trip: &Trip, active: bool) -> String {
    let marker = if active { "*" } else { " " };
    let status = match trip.status {
        TripStatus::Completed { completed_at } => {
            format!("completed {}", completed_at.strftime("%Y-%m-%d"))
        }
        status => status.label().to_string(),
    };
    format!(
        "{marker} {}  [{status}]  {}",
        short_id(trip.id),
        trip.name
    )
}

pub(super) fn format_definitions(definitions: &[ActionDefinition]) -> Vec<String> {
    definitions
        .iter()
        .map(|d| format!("  {} {:<20} {}", d.symbol, d.tag, d.title))
        .collect()
}

/// The parts of the vessel state an operator checks at a glance.
pub(super) fn format_vessel(state: &VesselState) -> Vec<String> {
    let mut lines = Vec::new();

    match (state.position, state.position_at) {
        (Some(p), Some(at)) => lines.push(format!("Position   {p} at {}", at.strftime("%H:%M"))),
        (Some(p), None) => lines.push(format!("Position   {p}")),
        _ => lines.push("Position   unknown".to_string()),
    }
    lines.push(format!(
        "Motion     SOG {}  COG {}  HDG {}",
        knots(state.sog),
        degrees(state.cog),
        degrees(state.heading)
    ));
    lines.push(format!(
        "Wind       TWS {}  Bft {}  AWA {}",
        knots(state.tws),
        state.beaufort,
        degrees(state.awa)
    ));
    lines.push(format!(
        "Status     {} / {} / zone {} / autopilot {}",
        state.propulsion, state.nav_status, state.nav_zone, state.autopilot
    ));
    if state.is_sailing() {
        lines.push(format!("Sailing    {} tack, {}", state.tack, state.point_of_sail));
    }
    for sail in &state.sails {
        let set = if sail.set { "set" } else { "down" };
        lines.push(format!("Sail       {} {set}, {}", sail.name, sail.reduction));
    }
    if let Some(emergency) = state.emergency {
        lines.push(format!("EMERGENCY  {emergency}"));
    }
    if !state.dangers.is_empty() {
        let dangers: Vec<String> = state.dangers.iter().map(ToString::to_string).collect();
        lines.push(format!("Dangers    {}", dangers.join(", ")));
    }
    if let Some(failure) = &state.failure {
        lines.push(format!("Failure    {failure}"));
    }
    lines
}

fn knots(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1} kn"))
}

fn degrees(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:03.0}°"))
}
