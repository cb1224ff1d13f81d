//! Position reconciliation: one "log now" run.
//!
//! A run takes two fixes a short interval apart, checks the vector they
//! make against the previous log fix, settles the navigation fields, and
//! commits everything as one log entry. The entry is anchored to the first
//! fix; the live position moves to the last one.
//!
//! The run borrows the deck exclusively for its whole length, so two runs
//! cannot overlap. Nothing is visible until the final flush: dropping the
//! future before then abandons the run with no trace.
//!
//! Only storage failures are errors. Missing sensors, a silent receiver,
//! an inconsistent vector, and an unusable operator answer all degrade to
//! a best-effort entry.

mod acquire;
mod derive;
#[cfg(test)]
pub(crate) mod fakes;
mod heading;
pub mod timing;
mod validate;

use crate::deck::Deck;
use crate::geo::Leg;
use crate::model::{Fix, FixSource, LogEntry, SensorSnapshot};
use crate::peripherals::Peripherals;
use crate::queue::LogQueue;
use crate::storage::{self, LogStore};

use acquire::acquire;
use derive::NavFields;
use validate::needs_second_measurement;

pub const NO_ACTIVE_TRIP: &str = "No active trip. Nothing was logged.";
pub const USING_LAST_LOG_AVERAGE: &str =
    "Position vector inconsistent after re-measuring, using last-log average.";

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    Logged(LogEntry),
    /// No active trip. Nothing was written.
    Aborted,
}

/// Runs the full reconciliation and writes one entry under `header`.
pub async fn log_now<S: LogStore>(
    deck: &mut Deck<S>,
    peripherals: Peripherals<'_>,
    header: &str,
) -> storage::Result<ReconcileOutcome> {
    log_now_with(deck, peripherals, header, LogQueue::new()).await
}

/// Like [`log_now`], with `extra` mutations riding on the same entry.
///
/// The run stages everything it settles next to `extra` and only merges
/// it with the deck's queue at the final commit. An aborted or failed run
/// leaves the deck's queue exactly as it found it.
pub async fn log_now_with<S: LogStore>(
    deck: &mut Deck<S>,
    peripherals: Peripherals<'_>,
    header: &str,
    mut run: LogQueue,
) -> storage::Result<ReconcileOutcome> {
    if deck.active_trip().is_none() {
        tracing::info!("log requested without an active trip");
        peripherals.notifier.notify(NO_ACTIVE_TRIP);
        return Ok(ReconcileOutcome::Aborted);
    }
    let last_log = deck.last_log_fix()?;

    let p1 = acquire(&peripherals, deck.vessel()).await;
    tokio::time::sleep(timing::FIX_INTERVAL).await;
    let mut p2 = acquire(&peripherals, deck.vessel()).await;

    let baseline = leg(last_log, measured(p1));
    let mut vector = leg(measured(p1), measured(p2));
    if needs_second_measurement(baseline.as_ref(), vector.as_ref()) {
        tracing::info!("re-measuring second fix");
        tokio::time::sleep(timing::REVALIDATION_WAIT).await;
        p2 = acquire(&peripherals, deck.vessel()).await;
        vector = leg(measured(p1), measured(p2));
        if needs_second_measurement(baseline.as_ref(), vector.as_ref()) {
            tracing::warn!("vector still inconsistent, falling back to last-log average");
            peripherals.notifier.notify(USING_LAST_LOG_AVERAGE);
            vector = baseline;
        }
    }
    if vector.is_none() {
        tracing::debug!("no measured vector, speed and course come from elsewhere");
    }

    let sensor = peripherals
        .sensors
        .snapshot()
        .filter(|s| s.is_fresh(jiff::Timestamp::now(), timing::SENSOR_FRESHNESS))
        .map(SensorSnapshot::sanitized);
    let before = NavFields::from(deck.vessel());
    let mut fields = derive::derive_fields(deck.vessel(), sensor.as_ref(), vector.as_ref());

    if let (Some(cog), Some(hdg)) = (fields.cog, fields.heading) {
        fields.heading = Some(heading::resolve(cog, hdg, peripherals.prompt).await);
    }

    stage_position(&mut run, p1, measured(p2).or(p1));
    for (field, value) in derive::changed(&before, &fields) {
        run.enqueue(field.key(), field.describe(value), move |draft| {
            field.set(&mut draft.vessel, value);
        });
    }

    let Some(entry) = deck.flush_with(Some(header), run)? else {
        peripherals.notifier.notify(NO_ACTIVE_TRIP);
        return Ok(ReconcileOutcome::Aborted);
    };
    peripherals
        .notifier
        .notify(&format!("Logged: {}", entry.text));
    Ok(ReconcileOutcome::Logged(entry))
}

fn leg(from: Option<Fix>, to: Option<Fix>) -> Option<Leg> {
    Leg::between(&from?, &to?)
}

/// A fix taken during this run. The last-known fallback only restates
/// the stored position and says nothing about motion.
fn measured(fix: Option<Fix>) -> Option<Fix> {
    fix.filter(|f| f.source != FixSource::LastKnown)
}

/// The entry takes P1's time and place; the vessel moves to `live`.
fn stage_position(run: &mut LogQueue, p1: Option<Fix>, live: Option<Fix>) {
    let text = p1.map_or_else(|| "No position fix".to_string(), |f| f.coordinate.to_string());
    run.enqueue("position", text, move |draft| {
        if let Some(p1) = p1 {
            draft.logged_at = p1.at;
            draft.position = Some(p1.coordinate);
        }
        if let Some(live) = live {
            draft.vessel.position = Some(live.coordinate);
            draft.vessel.position_at = Some(live.at);
        }
    });
}
