//! Logbook storage: append and load log entries.

use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{Coordinate, LogEntry, VesselState};

use super::{Result, Storage, StorageError, vessel};

const ENTRY_COLUMNS: &str = "id, trip_id, logged_at_ms, lat, lon, text, snapshot";

impl Storage {
    /// Inserts the entry and replaces the vessel row in one transaction.
    pub(super) fn write_entry_with_vessel(
        &self,
        entry: &LogEntry,
        vessel_state: &VesselState,
    ) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let exists: bool = tx.query_row(
            "SELECT EXISTS (SELECT 1 FROM trip WHERE id = ?1)",
            [entry.trip_id.to_string()],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StorageError::TripNotFound(entry.trip_id));
        }
        tx.execute(
            &format!("INSERT INTO log_entry ({ENTRY_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            rusqlite::params![
                entry.id.to_string(),
                entry.trip_id.to_string(),
                entry.logged_at.as_millisecond(),
                entry.position.map(|p| p.lat),
                entry.position.map(|p| p.lon),
                &entry.text,
                serde_json::to_string(&entry.snapshot)?,
            ],
        )?;
        vessel::write_vessel(&tx, vessel_state)?;
        tx.commit()?;
        Ok(())
    }

    pub(super) fn read_latest_entry(&self, trip_id: Uuid) -> Result<Option<LogEntry>> {
        let mut entries = self.query_entries(
            &format!(
                "SELECT {ENTRY_COLUMNS} FROM log_entry WHERE trip_id = ?1
                 ORDER BY logged_at_ms DESC LIMIT 1"
            ),
            trip_id,
        )?;
        Ok(entries.pop())
    }

    pub(super) fn read_entries(&self, trip_id: Uuid) -> Result<Vec<LogEntry>> {
        self.query_entries(
            &format!(
                "SELECT {ENTRY_COLUMNS} FROM log_entry WHERE trip_id = ?1
                 ORDER BY logged_at_ms ASC"
            ),
            trip_id,
        )
    }

    fn query_entries(&self, sql: &str, trip_id: Uuid) -> Result<Vec<LogEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([trip_id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, Option<f64>>(3)?,
                row.get::<_, Option<f64>>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, trip_id, logged_at_ms, lat, lon, text, snapshot) = row?;
            let position = match (lat, lon) {
                (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
                _ => None,
            };
            entries.push(LogEntry {
                id: id
                    .parse()
                    .map_err(|e| StorageError::Corrupt(format!("invalid entry id: {e}")))?,
                trip_id: trip_id
                    .parse()
                    .map_err(|e| StorageError::Corrupt(format!("invalid trip id: {e}")))?,
                logged_at: Timestamp::from_millisecond(logged_at_ms)
                    .map_err(|e| StorageError::Corrupt(format!("invalid logged_at: {e}")))?,
                position,
                text,
                snapshot: serde_json::from_str(&snapshot)?,
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{NavSnapshot, Trip};
    use crate::storage::{LogStore, test_storage};

    use super::*;

    fn entry(trip: &Trip, seconds: i64, text: &str) -> LogEntry {
        LogEntry {
            id: Uuid::new_v4(),
            trip_id: trip.id,
            logged_at: Timestamp::new(seconds, 0).unwrap(),
            position: Some(Coordinate::new(54.5, 10.2)),
            text: text.into(),
            snapshot: NavSnapshot {
                sog: Some(5.5),
                beaufort: 3,
                ..NavSnapshot::default()
            },
        }
    }

    #[test]
    fn commit_and_load_entries() {
        let (_dir, storage) = test_storage();
        let trip = Trip::new("Day sail");
        storage.create_trip(&trip).unwrap();

        let vessel = VesselState {
            version: 1,
            ..VesselState::default()
        };
        storage
            .commit(&entry(&trip, 2_000, "Cast off"), &vessel)
            .unwrap();
        storage
            .commit(&entry(&trip, 1_000, "Crew briefing"), &vessel)
            .unwrap();

        let entries = storage.entries(trip.id).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "Crew briefing");
        assert_eq!(entries[1].snapshot.sog, Some(5.5));
        assert_eq!(storage.load_vessel().unwrap().unwrap().version, 1);
    }

    #[test]
    fn latest_entry_is_most_recent_by_timestamp() {
        let (_dir, storage) = test_storage();
        let trip = Trip::new("Day sail");
        storage.create_trip(&trip).unwrap();
        let vessel = VesselState::default();

        storage.commit(&entry(&trip, 3_000, "Late"), &vessel).unwrap();
        storage.commit(&entry(&trip, 1_000, "Early"), &vessel).unwrap();

        let latest = storage.latest_entry(trip.id).unwrap().unwrap();
        assert_eq!(latest.text, "Late");
    }

    #[test]
    fn latest_entry_empty_trip() {
        let (_dir, storage) = test_storage();
        let trip = Trip::new("Day sail");
        storage.create_trip(&trip).unwrap();

        assert!(storage.latest_entry(trip.id).unwrap().is_none());
    }

    #[test]
    fn commit_for_unknown_trip_writes_nothing() {
        let (_dir, storage) = test_storage();
        let trip = Trip::new("Never created");

        let err = storage
            .commit(&entry(&trip, 1_000, "Lost"), &VesselState::default())
            .unwrap_err();

        assert!(matches!(err, StorageError::TripNotFound(_)));
        assert!(storage.load_vessel().unwrap().is_none());
    }
}
