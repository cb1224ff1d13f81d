//! In-memory store for tests.

use std::cell::{Cell, RefCell};

use uuid::Uuid;

use crate::model::{LogEntry, Trip, VesselState};

use super::{LogStore, Result, StorageError};

#[derive(Default)]
pub struct MemoryStore {
    trips: RefCell<Vec<Trip>>,
    entries: RefCell<Vec<LogEntry>>,
    vessel: RefCell<Option<VesselState>>,
    /// When set, the next commit fails with an I/O error.
    fail_next_commit: Cell<bool>,
}

impl MemoryStore {
    pub fn with_trip(trip: &Trip) -> Self {
        let store = Self::default();
        store.trips.borrow_mut().push(trip.clone());
        store
    }

    pub fn entry_count(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn fail_next_commit(&self) {
        self.fail_next_commit.set(true);
    }
}

impl LogStore for MemoryStore {
    fn create_trip(&self, trip: &Trip) -> Result<()> {
        let mut trips = self.trips.borrow_mut();
        if trips.iter().any(|t| t.id == trip.id) {
            return Err(StorageError::TripAlreadyExists(trip.id));
        }
        trips.push(trip.clone());
        Ok(())
    }

    fn update_trip(&self, trip: &Trip) -> Result<()> {
        let mut trips = self.trips.borrow_mut();
        let slot = trips
            .iter_mut()
            .find(|t| t.id == trip.id)
            .ok_or(StorageError::TripNotFound(trip.id))?;
        if slot.status != trip.status && !slot.status.can_become(&trip.status) {
            return Err(StorageError::IllegalTransition(slot.status, trip.status));
        }
        *slot = trip.clone();
        Ok(())
    }

    fn load_trip(&self, id: Uuid) -> Result<Trip> {
        self.trips
            .borrow()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StorageError::TripNotFound(id))
    }

    fn list_trips(&self) -> Result<Vec<Trip>> {
        Ok(self.trips.borrow().clone())
    }

    fn commit(&self, entry: &LogEntry, vessel: &VesselState) -> Result<()> {
        if self.fail_next_commit.replace(false) {
            return Err(std::io::Error::other("disk full").into());
        }
        self.entries.borrow_mut().push(entry.clone());
        *self.vessel.borrow_mut() = Some(vessel.clone());
        Ok(())
    }

    fn latest_entry(&self, trip_id: Uuid) -> Result<Option<LogEntry>> {
        Ok(self
            .entries
            .borrow()
            .iter()
            .filter(|e| e.trip_id == trip_id)
            .max_by_key(|e| e.logged_at)
            .cloned())
    }

    fn entries(&self, trip_id: Uuid) -> Result<Vec<LogEntry>> {
        let mut entries: Vec<_> = self
            .entries
            .borrow()
            .iter()
            .filter(|e| e.trip_id == trip_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.logged_at);
        Ok(entries)
    }

    fn load_vessel(&self) -> Result<Option<VesselState>> {
        Ok(self.vessel.borrow().clone())
    }

    fn save_vessel(&self, vessel: &VesselState) -> Result<()> {
        *self.vessel.borrow_mut() = Some(vessel.clone());
        Ok(())
    }
}
