//! Tiered fix acquisition.
//!
//! Sources are tried strictly in order and never blended:
//!
//! 1. a fresh sensor snapshot with a non-trivial position,
//! 2. a one-shot device fix, bounded by [`DEVICE_FIX_TIMEOUT`],
//! 3. the vessel's last known position.

use jiff::Timestamp;

use crate::model::{Fix, FixSource, VesselState};
use crate::peripherals::Peripherals;

use super::timing::{DEVICE_FIX_TIMEOUT, SENSOR_FRESHNESS};

/// Takes one fix, or `None` if no tier has a position.
pub async fn acquire(peripherals: &Peripherals<'_>, vessel: &VesselState) -> Option<Fix> {
    if let Some(fix) = peripherals
        .sensors
        .snapshot()
        .filter(|s| s.is_fresh(Timestamp::now(), SENSOR_FRESHNESS))
        .and_then(|s| s.fix())
    {
        tracing::debug!(lat = fix.coordinate.lat, lon = fix.coordinate.lon, "fix from sensor");
        return Some(fix);
    }

    match tokio::time::timeout(DEVICE_FIX_TIMEOUT, peripherals.locator.request_fix()).await {
        Ok(Some(fix)) if !fix.coordinate.is_trivial() => {
            tracing::debug!(lat = fix.coordinate.lat, lon = fix.coordinate.lon, "fix from device");
            return Some(fix);
        }
        Ok(_) => tracing::debug!("device had no usable fix"),
        Err(_) => tracing::warn!("device fix timed out"),
    }

    let last_known = last_known(vessel);
    if last_known.is_none() {
        tracing::warn!("no position from any source");
    }
    last_known
}

/// The stored position, stamped now: it is the best answer available at
/// the moment of asking.
fn last_known(vessel: &VesselState) -> Option<Fix> {
    let coordinate = vessel.position.filter(|c| !c.is_trivial())?;
    Some(Fix::new(Timestamp::now(), coordinate, FixSource::LastKnown))
}
