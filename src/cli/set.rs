//! Direct state edits that do not belong in the logbook.
//!
//! Used to line the live state up with reality, for instance after
//! restoring a backup or before the first trip. Every edit bumps the
//! state version; no entry is written.

use clap::Args;

use crate::deck::Deck;
use crate::model::{Autopilot, NavStatus, NavZone, PointOfSail, Tack, VesselState};
use crate::storage::LogStore;

#[derive(Debug, Args)]
pub struct SetArgs {
    #[arg(long)]
    zone: Option<NavZone>,

    #[arg(long)]
    status: Option<NavStatus>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=12))]
    beaufort: Option<u8>,

    #[arg(long)]
    autopilot: Option<Autopilot>,

    #[arg(long)]
    tack: Option<Tack>,

    #[arg(long)]
    point_of_sail: Option<PointOfSail>,

    /// Clear the recorded equipment failure.
    #[arg(long)]
    clear_failure: bool,
}

impl SetArgs {
    fn is_empty(&self) -> bool {
        self.zone.is_none()
            && self.status.is_none()
            && self.beaufort.is_none()
            && self.autopilot.is_none()
            && self.tack.is_none()
            && self.point_of_sail.is_none()
            && !self.clear_failure
    }

    fn apply(&self, state: &mut VesselState) {
        if let Some(zone) = self.zone {
            state.nav_zone = zone;
        }
        if let Some(status) = self.status {
            state.nav_status = status;
        }
        if let Some(beaufort) = self.beaufort {
            state.beaufort = beaufort;
        }
        if let Some(autopilot) = self.autopilot {
            state.autopilot = autopilot;
        }
        if let Some(tack) = self.tack {
            state.tack = tack;
        }
        if let Some(point_of_sail) = self.point_of_sail {
            state.point_of_sail = point_of_sail;
        }
        if self.clear_failure {
            state.failure = None;
        }
    }
}

pub(super) fn cmd_set<S: LogStore>(deck: &mut Deck<S>, args: &SetArgs) -> Result<(), String> {
    if args.is_empty() {
        return Err("nothing to set (see `shiplog set --help`)".to_string());
    }

    let before = deck.situation();
    deck.adjust(|state| args.apply(state))
        .map_err(|e| format!("failed to save vessel state: {e}"))?;
    tracing::info!(version = deck.vessel().version, "vessel state adjusted");

    let after = deck.situation();
    if before == after {
        eprintln!("Vessel state v{}", deck.vessel().version);
    } else {
        eprintln!("Vessel state v{}, situation {before} → {after}", deck.vessel().version);
    }
    Ok(())
}
