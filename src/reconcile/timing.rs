//! Fixed waits and windows for one reconciliation run.
//!
//! None of these are operator-configurable. Every suspension in a run is
//! bounded by one of them.

use std::time::Duration;

/// A sensor snapshot older than this is not trusted.
pub const SENSOR_FRESHNESS: Duration = Duration::from_secs(10);

/// How long a one-shot device fix request may take.
pub const DEVICE_FIX_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause between the first and second fix.
pub const FIX_INTERVAL: Duration = Duration::from_secs(3);

/// Pause before re-measuring a second fix that failed validation.
pub const REVALIDATION_WAIT: Duration = Duration::from_secs(10);
