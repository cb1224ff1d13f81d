//! Trip storage: create, load, update, and list trips.

use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::model::{Trip, TripStatus};

use super::{Result, Storage, StorageError};

impl Storage {
    pub(super) fn insert_trip(&self, trip: &Trip) -> Result<()> {
        let (status, completed_at) = serialize_status(&trip.status);
        let rows = self.conn.execute(
            "INSERT OR IGNORE INTO trip (id, name, created_at, status, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                trip.id.to_string(),
                &trip.name,
                trip.created_at.to_string(),
                status,
                completed_at,
            ],
        )?;
        if rows == 0 {
            return Err(StorageError::TripAlreadyExists(trip.id));
        }
        Ok(())
    }

    /// Updates a trip's row, refusing lifecycle moves the model forbids.
    pub(super) fn write_trip(&self, trip: &Trip) -> Result<()> {
        let current = self.read_trip(trip.id)?;
        if current.status != trip.status && !current.status.can_become(&trip.status) {
            return Err(StorageError::IllegalTransition(current.status, trip.status));
        }
        let (status, completed_at) = serialize_status(&trip.status);
        self.conn.execute(
            "UPDATE trip SET name = ?1, status = ?2, completed_at = ?3 WHERE id = ?4",
            rusqlite::params![&trip.name, status, completed_at, trip.id.to_string()],
        )?;
        Ok(())
    }

    pub(super) fn read_trip(&self, id: Uuid) -> Result<Trip> {
        load_trip_row(&self.conn, id)?.ok_or(StorageError::TripNotFound(id))
    }

    /// All trips, oldest first.
    pub(super) fn read_trips(&self) -> Result<Vec<Trip>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at, status, completed_at FROM trip")?;
        let rows = stmt.query_map([], read_row)?;
        let mut trips = Vec::new();
        for row in rows {
            trips.push(parse_row(row?)?);
        }
        trips.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(trips)
    }
}

type TripRow = (String, String, String, String, Option<String>);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TripRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn load_trip_row(conn: &Connection, id: Uuid) -> Result<Option<Trip>> {
    let row = conn
        .query_row(
            "SELECT id, name, created_at, status, completed_at FROM trip WHERE id = ?1",
            [id.to_string()],
            read_row,
        )
        .optional()?;
    row.map(parse_row).transpose()
}

fn parse_row((id, name, created_at, status, completed_at): TripRow) -> Result<Trip> {
    let id = id
        .parse::<Uuid>()
        .map_err(|e| StorageError::Corrupt(format!("invalid trip id: {e}")))?;
    let created_at = created_at
        .parse::<jiff::Timestamp>()
        .map_err(|e| StorageError::Corrupt(format!("invalid created_at: {e}")))?;
    let status = deserialize_status(&status, completed_at.as_deref())?;
    Ok(Trip {
        id,
        name,
        created_at,
        status,
    })
}

/// Converts a `TripStatus` to column values for the trip table.
fn serialize_status(status: &TripStatus) -> (&'static str, Option<String>) {
    match status {
        TripStatus::Completed { completed_at } => (status.label(), Some(completed_at.to_string())),
        _ => (status.label(), None),
    }
}

/// Reconstructs a `TripStatus` from trip table column values.
fn deserialize_status(status: &str, completed_at: Option<&str>) -> Result<TripStatus> {
    match status {
        "preparing" => Ok(TripStatus::Preparing),
        "started" => Ok(TripStatus::Started),
        "underway" => Ok(TripStatus::Underway),
        "interrupted" => Ok(TripStatus::Interrupted),
        "completed" => {
            let completed_at = completed_at
                .ok_or_else(|| {
                    StorageError::Corrupt("trip is completed but completed_at is null".into())
                })?
                .parse::<jiff::Timestamp>()
                .map_err(|e| StorageError::Corrupt(format!("invalid completed_at: {e}")))?;
            Ok(TripStatus::Completed { completed_at })
        }
        other => Err(StorageError::Corrupt(format!("unknown trip status: {other}"))),
    }
}
