//! The deck: live vessel state, the active trip, and the log queue,
//! bound to one store.
//!
//! Every change to the live state goes through here. Logged changes go
//! through the queue and land atomically with their entry; `adjust` is the
//! one unlogged write path, for setup edits outside a trip's record.

use jiff::Timestamp;

use crate::catalog::ActionContext;
use crate::model::{Fix, FixSource, LogEntry, Situation, Trip, TripStatus, VesselState};
use crate::queue::{LogDraft, LogQueue};
use crate::situation;
use crate::storage::{self, LogStore, StorageError};

pub struct Deck<S: LogStore> {
    store: S,
    vessel: VesselState,
    trip: Option<Trip>,
    queue: LogQueue,
}

impl<S: LogStore> Deck<S> {
    /// Loads the live state and its active trip from the store.
    ///
    /// A vessel pointing at a trip the store no longer has is treated as
    /// having no trip.
    pub fn open(store: S) -> storage::Result<Self> {
        let vessel = store.load_vessel()?.unwrap_or_default();
        let trip = match vessel.active_trip {
            Some(id) => match store.load_trip(id) {
                Ok(trip) => Some(trip),
                Err(StorageError::TripNotFound(_)) => {
                    tracing::warn!(trip = %id, "active trip missing from store");
                    None
                }
                Err(e) => return Err(e),
            },
            None => None,
        };
        Ok(Self {
            store,
            vessel,
            trip,
            queue: LogQueue::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn vessel(&self) -> &VesselState {
        &self.vessel
    }

    pub fn trip(&self) -> Option<&Trip> {
        self.trip.as_ref()
    }

    /// The trip entries can be written against right now.
    pub fn active_trip(&self) -> Option<&Trip> {
        self.trip
            .as_ref()
            .filter(|t| t.is_active() && self.vessel.active_trip == Some(t.id))
    }

    pub fn queue(&self) -> &LogQueue {
        &self.queue
    }

    pub fn situation(&self) -> Situation {
        situation::derive(&self.vessel, self.trip.as_ref())
    }

    pub fn context(&self) -> ActionContext<'_> {
        ActionContext::new(&self.vessel, self.trip.as_ref())
    }

    pub fn enqueue(
        &mut self,
        key: impl Into<String>,
        text: impl Into<String>,
        apply: impl Fn(&mut LogDraft) + Send + 'static,
    ) {
        self.queue.enqueue(key, text, apply);
    }

    pub fn flush(&mut self, header: Option<&str>) -> storage::Result<Option<LogEntry>> {
        self.queue
            .flush(header, &mut self.vessel, self.trip.as_ref(), &self.store)
    }

    /// Flushes with a batch staged on top. The batch never lands in the
    /// deck's queue, written or not.
    pub fn flush_with(
        &mut self,
        header: Option<&str>,
        extra: LogQueue,
    ) -> storage::Result<Option<LogEntry>> {
        self.queue
            .flush_with(header, extra, &mut self.vessel, self.trip.as_ref(), &self.store)
    }

    pub fn write_now(
        &mut self,
        flush_pending: bool,
        header: Option<&str>,
        key: impl Into<String>,
        text: impl Into<String>,
        apply: impl Fn(&mut LogDraft) + Send + 'static,
    ) -> storage::Result<Option<LogEntry>> {
        self.queue.write_now(
            flush_pending,
            header,
            key,
            text,
            apply,
            &mut self.vessel,
            self.trip.as_ref(),
            &self.store,
        )
    }

    pub fn discard_pending(&mut self) {
        self.queue.discard();
    }

    /// Where and when the active trip was last logged, if it has a position.
    pub fn last_log_fix(&self) -> storage::Result<Option<Fix>> {
        let Some(trip) = self.active_trip() else {
            return Ok(None);
        };
        let entry = self.store.latest_entry(trip.id)?;
        Ok(entry.and_then(|e| {
            e.position
                .map(|c| Fix::new(e.logged_at, c, FixSource::LastKnown))
        }))
    }

    /// Creates a trip in `Preparing` and makes it the vessel's active trip.
    ///
    /// Any still-active trip is left as it is; only the pointer moves.
    pub fn open_trip(&mut self, name: &str) -> storage::Result<Trip> {
        let trip = Trip::new(name);
        self.store.create_trip(&trip)?;
        self.adjust(|v| v.active_trip = Some(trip.id))?;
        tracing::info!(trip = %trip.id, name, "trip opened");
        self.trip = Some(trip.clone());
        Ok(trip)
    }

    /// Moves the active trip along its lifecycle.
    ///
    /// Completing a trip also releases it from the vessel.
    pub fn advance_trip(&mut self, next: TripStatus) -> storage::Result<()> {
        let Some(current) = &self.trip else {
            return Err(StorageError::NoActiveTrip);
        };
        let mut trip = current.clone();
        trip.advance(next)
            .map_err(|(from, to)| StorageError::IllegalTransition(from, to))?;
        self.store.update_trip(&trip)?;
        tracing::info!(trip = %trip.id, status = trip.status.label(), "trip advanced");

        if trip.is_active() {
            self.trip = Some(trip);
        } else {
            self.queue.discard();
            self.adjust(|v| v.active_trip = None)?;
            self.trip = None;
        }
        Ok(())
    }

    /// Whether the trip could move to `next`, without moving it.
    pub fn check_transition(&self, next: TripStatus) -> storage::Result<()> {
        let Some(current) = &self.trip else {
            return Err(StorageError::NoActiveTrip);
        };
        if current.status.can_become(&next) {
            Ok(())
        } else {
            Err(StorageError::IllegalTransition(current.status, next))
        }
    }

    /// Completes the active trip now.
    pub fn complete_trip(&mut self) -> storage::Result<()> {
        self.advance_trip(TripStatus::Completed {
            completed_at: Timestamp::now(),
        })
    }

    /// Edits the live state without writing a log entry.
    pub fn adjust(&mut self, edit: impl FnOnce(&mut VesselState)) -> storage::Result<()> {
        let mut next = self.vessel.clone();
        edit(&mut next);
        next.version = self.vessel.version + 1;
        self.store.save_vessel(&next)?;
        self.vessel = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{Coordinate, NavZone};
    use crate::storage::MemoryStore;

    #[test]
    fn fresh_store_opens_empty() {
        let deck = Deck::open(MemoryStore::default()).unwrap();

        assert_eq!(deck.vessel(), &VesselState::default());
        assert!(deck.trip().is_none());
        assert_eq!(deck.situation(), Situation::PreparingTrip);
    }

    #[test]
    fn open_trip_becomes_active_and_survives_reopen() {
        let mut deck = Deck::open(MemoryStore::default()).unwrap();
        let trip = deck.open_trip("Kiel to Marstal").unwrap();
        deck.advance_trip(TripStatus::Started).unwrap();

        let reopened = Deck::open(deck.store).unwrap();
        assert_eq!(reopened.trip().map(|t| t.id), Some(trip.id));
        assert_eq!(reopened.trip().unwrap().status, TripStatus::Started);
        assert_eq!(reopened.situation(), Situation::TripStarted);
    }

    #[test]
    fn illegal_transition_is_rejected() {
        let mut deck = Deck::open(MemoryStore::default()).unwrap();
        deck.open_trip("Day sail").unwrap();

        let err = deck.advance_trip(TripStatus::Interrupted).unwrap_err();

        assert!(matches!(err, StorageError::IllegalTransition(..)));
        assert_eq!(deck.trip().unwrap().status, TripStatus::Preparing);
    }

    #[test]
    fn completing_releases_the_trip() {
        let mut deck = Deck::open(MemoryStore::default()).unwrap();
        deck.open_trip("Day sail").unwrap();
        deck.enqueue("note", "pending", |_| {});

        deck.complete_trip().unwrap();

        assert!(deck.trip().is_none());
        assert!(deck.vessel().active_trip.is_none());
        assert!(deck.queue().is_empty());
        assert!(matches!(
            deck.advance_trip(TripStatus::Started),
            Err(StorageError::NoActiveTrip)
        ));
    }

    #[test]
    fn adjust_bumps_version_and_persists() {
        let mut deck = Deck::open(MemoryStore::default()).unwrap();
        deck.adjust(|v| v.nav_zone = NavZone::Waterway).unwrap();

        assert_eq!(deck.vessel().version, 1);
        let stored = deck.store().load_vessel().unwrap().unwrap();
        assert_eq!(stored.nav_zone, NavZone::Waterway);
    }

    #[test]
    fn last_log_fix_comes_from_latest_entry() {
        let mut deck = Deck::open(MemoryStore::default()).unwrap();
        deck.open_trip("Day sail").unwrap();
        assert!(deck.last_log_fix().unwrap().is_none());

        deck.write_now(false, Some("Check"), "fix", "", |d| {
            d.position = Some(Coordinate::new(54.3, 10.1));
        })
        .unwrap()
        .unwrap();

        let fix = deck.last_log_fix().unwrap().unwrap();
        assert_eq!(fix.coordinate, Coordinate::new(54.3, 10.1));
        assert_eq!(fix.source, FixSource::LastKnown);
    }
}
