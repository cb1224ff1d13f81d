//! Action runtime: fires catalog actions against the deck.
//!
//! One action runs at a time. While a run is suspended (waiting on a fix,
//! a timer, or the operator) a second `fire` is refused with
//! [`RuntimeError::Busy`] and deck queries report the same.

mod dispatch;

use std::cell::{Cell, Ref, RefCell};

use crate::catalog::{ActionKind, Available, Catalog};
use crate::deck::Deck;
use crate::model::{Autopilot, Danger, LogEntry, NavZone, SevereWeather, Situation};
use crate::peripherals::Peripherals;
use crate::storage::{LogStore, StorageError};

/// Errors that can occur while firing an action.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("another action is still in progress")]
    Busy,

    #[error("{0} is not available right now")]
    NotAvailable(ActionKind),

    #[error("{kind} needs a {param}")]
    MissingParameter {
        kind: ActionKind,
        param: &'static str,
    },

    #[error("{kind}: {detail}")]
    InvalidParameter { kind: ActionKind, detail: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Operator input an action may need. Unused fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct ActionParams {
    pub note: Option<String>,
    pub sail: Option<String>,
    pub danger: Option<Danger>,
    pub course: Option<f64>,
    pub zone: Option<NavZone>,
    pub beaufort: Option<u8>,
    pub autopilot: Option<Autopilot>,
    pub weather: Option<SevereWeather>,
}

/// What firing an action did.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// A log entry was written.
    Logged(LogEntry),
    /// The change waits in the log queue for the next entry.
    Queued,
    /// Nothing was written because there is no active trip.
    Aborted,
    /// The action belongs to a screen this layer does not own.
    Delegated(&'static str),
}

pub struct ActionRuntime<'p, S: LogStore> {
    deck: RefCell<Deck<S>>,
    peripherals: Peripherals<'p>,
    in_flight: Cell<bool>,
}

/// Clears the in-flight flag however the run ends, including being dropped.
struct InFlight<'a>(&'a Cell<bool>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<'p, S: LogStore> ActionRuntime<'p, S> {
    pub fn new(deck: Deck<S>, peripherals: Peripherals<'p>) -> Self {
        Self {
            deck: RefCell::new(deck),
            peripherals,
            in_flight: Cell::new(false),
        }
    }

    pub fn into_deck(self) -> Deck<S> {
        self.deck.into_inner()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    /// Read access to the deck between runs.
    pub fn deck(&self) -> Result<Ref<'_, Deck<S>>, RuntimeError> {
        self.deck.try_borrow().map_err(|_| RuntimeError::Busy)
    }

    pub fn situation(&self) -> Result<Situation, RuntimeError> {
        Ok(self.deck()?.situation())
    }

    pub fn available(&self) -> Result<Available, RuntimeError> {
        let deck = self.deck()?;
        Ok(Catalog::available(deck.situation(), &deck.context()))
    }

    /// Fires one action.
    ///
    /// Refused while another run is in flight, and for actions the current
    /// state does not offer.
    #[allow(clippy::await_holding_refcell_ref)]
    pub async fn fire(
        &self,
        kind: ActionKind,
        params: ActionParams,
    ) -> Result<ActionOutcome, RuntimeError> {
        if self.in_flight.replace(true) {
            tracing::debug!(action = kind.tag(), "refused, busy");
            return Err(RuntimeError::Busy);
        }
        let _flight = InFlight(&self.in_flight);

        // The in-flight flag keeps this borrow exclusive across awaits.
        let mut deck = self.deck.try_borrow_mut().map_err(|_| RuntimeError::Busy)?;
        if !kind.is_visible(&deck.context()) {
            return Err(RuntimeError::NotAvailable(kind));
        }

        tracing::info!(action = kind.tag(), situation = %deck.situation(), "firing action");
        let outcome = dispatch::dispatch(&mut *deck, self.peripherals, kind, params).await?;
        tracing::debug!(action = kind.tag(), ?outcome, "action finished");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::pin::pin;
    use std::time::Duration;

    use crate::model::{Coordinate, TripStatus};
    use crate::reconcile::fakes::Rig;
    use crate::storage::MemoryStore;

    fn underway_deck() -> Deck<MemoryStore> {
        let mut deck = Deck::open(MemoryStore::default()).unwrap();
        deck.open_trip("Test").unwrap();
        deck.advance_trip(TripStatus::Started).unwrap();
        deck.advance_trip(TripStatus::Underway).unwrap();
        deck
    }

    #[tokio::test(start_paused = true)]
    async fn second_fire_while_suspended_is_busy() {
        let rig = Rig::new().with_fixes([
            Some(Coordinate::new(54.0, 10.0)),
            Some(Coordinate::new(54.001, 10.0)),
        ]);
        let runtime = ActionRuntime::new(underway_deck(), rig.peripherals());

        let mut first = pin!(runtime.fire(ActionKind::LogPosition, ActionParams::default()));
        let poll = tokio::time::timeout(Duration::from_millis(10), first.as_mut()).await;
        assert!(poll.is_err());
        assert!(runtime.is_busy());

        let second = runtime
            .fire(
                ActionKind::ManualLog,
                ActionParams {
                    note: Some("Dolphins".into()),
                    ..ActionParams::default()
                },
            )
            .await;
        assert!(matches!(second, Err(RuntimeError::Busy)));
        assert!(matches!(runtime.situation(), Err(RuntimeError::Busy)));

        let outcome = first.await.unwrap();
        assert!(matches!(outcome, ActionOutcome::Logged(_)));
        assert!(!runtime.is_busy());
        assert_eq!(runtime.deck().unwrap().store().entry_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_run_releases_the_guard() {
        let rig = Rig::new();
        let runtime = ActionRuntime::new(underway_deck(), rig.peripherals());

        let run = runtime.fire(ActionKind::LogPosition, ActionParams::default());
        let _ = tokio::time::timeout(Duration::from_millis(10), run).await;

        assert!(!runtime.is_busy());
        assert_eq!(runtime.deck().unwrap().store().entry_count(), 0);
    }

    #[tokio::test]
    async fn invisible_action_is_refused() {
        let rig = Rig::new();
        let runtime = ActionRuntime::new(underway_deck(), rig.peripherals());

        let err = runtime
            .fire(ActionKind::MotorStop, ActionParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::NotAvailable(ActionKind::MotorStop)));
        assert!(!runtime.is_busy());
    }

    #[tokio::test]
    async fn available_reflects_live_state() {
        let rig = Rig::new();
        let runtime = ActionRuntime::new(underway_deck(), rig.peripherals());
        assert_eq!(runtime.situation().unwrap(), Situation::CoastalMotor);

        runtime
            .fire(ActionKind::MotorStart, ActionParams::default())
            .await
            .unwrap();

        let available = runtime.available().unwrap();
        let global: Vec<_> = available.global.iter().map(|d| d.kind).collect();
        assert!(global.contains(&ActionKind::MotorStop));
        assert!(!global.contains(&ActionKind::MotorStart));
    }
}
