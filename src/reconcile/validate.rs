//! Vector validation against the previous log fix.

use crate::geo::{self, Leg};

/// Largest tolerated relative speed deviation from the baseline.
pub const SPEED_TOLERANCE: f64 = 0.20;

/// Largest tolerated track change from the baseline, in degrees.
pub const BEARING_TOLERANCE_DEG: f64 = 20.0;

/// Below this baseline speed the vessel is treated as stationary and no
/// check is made. Bearings between near-identical fixes are noise.
pub const STATIONARY_KN: f64 = 0.2;

/// Whether the candidate vector disagrees with the baseline enough to
/// warrant a second measurement.
///
/// `baseline` is the last-log→P1 leg, `candidate` the P1→P2 leg. Without
/// both there is nothing to compare and the candidate stands.
pub fn needs_second_measurement(baseline: Option<&Leg>, candidate: Option<&Leg>) -> bool {
    let (Some(baseline), Some(candidate)) = (baseline, candidate) else {
        return false;
    };
    if baseline.speed_kn < STATIONARY_KN {
        return false;
    }

    let deviation = (candidate.speed_kn - baseline.speed_kn).abs() / baseline.speed_kn;
    let speed_off = deviation > SPEED_TOLERANCE;
    let bearing_off = geo::angular_delta(baseline.bearing_deg, candidate.bearing_deg)
        > BEARING_TOLERANCE_DEG;

    if speed_off || bearing_off {
        tracing::debug!(
            baseline_kn = baseline.speed_kn,
            candidate_kn = candidate.speed_kn,
            baseline_deg = baseline.bearing_deg,
            candidate_deg = candidate.bearing_deg,
            "vector disagrees with last log"
        );
    }
    speed_off || bearing_off
}
