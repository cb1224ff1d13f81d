//! Local persistence for trips, log entries, and the live vessel state.
//!
//! Everything lives in a single `SQLite` file under the storage root:
//!
//! ```text
//! <root>/
//!   shiplog.sqlite   # trip, log_entry, vessel tables
//! ```
//!
//! The rest of the crate only sees the [`LogStore`] trait.

mod logbook;
#[cfg(test)]
mod memory;
mod trip;
mod vessel;

use std::{fs, io, path::PathBuf};

use rusqlite::Connection;
use uuid::Uuid;

use crate::model::{LogEntry, Trip, TripStatus, VesselState};

#[cfg(test)]
pub use memory::MemoryStore;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("trip not found: {0}")]
    TripNotFound(Uuid),

    #[error("no active trip")]
    NoActiveTrip,

    #[error("trip already exists: {0}")]
    TripAlreadyExists(Uuid),

    #[error("trip cannot go from {} to {}", .0.label(), .1.label())]
    IllegalTransition(TripStatus, TripStatus),

    #[error("corrupt data: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// What the logbook needs from a persistent store.
///
/// `commit` is the only write that makes a log entry visible, and it
/// stores the entry and the resulting vessel state together.
pub trait LogStore {
    fn create_trip(&self, trip: &Trip) -> Result<()>;
    fn update_trip(&self, trip: &Trip) -> Result<()>;
    fn load_trip(&self, id: Uuid) -> Result<Trip>;
    fn list_trips(&self) -> Result<Vec<Trip>>;

    /// Writes a log entry and the vessel state it produced, atomically.
    fn commit(&self, entry: &LogEntry, vessel: &VesselState) -> Result<()>;

    /// The most recent entry for a trip by timestamp, if any.
    fn latest_entry(&self, trip_id: Uuid) -> Result<Option<LogEntry>>;

    /// All entries for a trip, oldest first.
    fn entries(&self, trip_id: Uuid) -> Result<Vec<LogEntry>>;

    fn load_vessel(&self) -> Result<Option<VesselState>>;
    fn save_vessel(&self, vessel: &VesselState) -> Result<()>;
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS trip (
        id            TEXT PRIMARY KEY,
        name          TEXT NOT NULL,
        created_at    TEXT NOT NULL,
        status        TEXT NOT NULL,
        completed_at  TEXT
    );
    CREATE TABLE IF NOT EXISTS log_entry (
        id            TEXT PRIMARY KEY,
        trip_id       TEXT NOT NULL REFERENCES trip(id),
        logged_at_ms  INTEGER NOT NULL,
        lat           REAL,
        lon           REAL,
        text          TEXT NOT NULL,
        snapshot      TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS log_entry_by_trip ON log_entry (trip_id, logged_at_ms);
    CREATE TABLE IF NOT EXISTS vessel (
        id       INTEGER PRIMARY KEY CHECK (id = 1),
        version  INTEGER NOT NULL,
        state    TEXT NOT NULL
    );
";

/// Local `SQLite`-backed storage.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the database under the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let conn = Connection::open(root.join("shiplog.sqlite"))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

impl LogStore for Storage {
    fn create_trip(&self, trip: &Trip) -> Result<()> {
        self.insert_trip(trip)
    }

    fn update_trip(&self, trip: &Trip) -> Result<()> {
        self.write_trip(trip)
    }

    fn load_trip(&self, id: Uuid) -> Result<Trip> {
        self.read_trip(id)
    }

    fn list_trips(&self) -> Result<Vec<Trip>> {
        self.read_trips()
    }

    fn commit(&self, entry: &LogEntry, vessel: &VesselState) -> Result<()> {
        self.write_entry_with_vessel(entry, vessel)
    }

    fn latest_entry(&self, trip_id: Uuid) -> Result<Option<LogEntry>> {
        self.read_latest_entry(trip_id)
    }

    fn entries(&self, trip_id: Uuid) -> Result<Vec<LogEntry>> {
        self.read_entries(trip_id)
    }

    fn load_vessel(&self) -> Result<Option<VesselState>> {
        self.read_vessel()
    }

    fn save_vessel(&self, vessel: &VesselState) -> Result<()> {
        vessel::write_vessel(&self.conn, vessel)
    }
}

#[cfg(test)]
pub(crate) fn test_storage() -> (tempfile::TempDir, Storage) {
    let dir = tempfile::TempDir::new().unwrap();
    let storage = Storage::new(dir.path().join("shiplog")).unwrap();
    (dir, storage)
}
