//! Vessel storage: the single live state row.

use rusqlite::{Connection, OptionalExtension};

use crate::model::VesselState;

use super::{Result, Storage};

impl Storage {
    pub(super) fn read_vessel(&self) -> Result<Option<VesselState>> {
        let json: Option<String> = self
            .conn
            .query_row("SELECT state FROM vessel WHERE id = 1", [], |row| row.get(0))
            .optional()?;
        Ok(json.map(|j| serde_json::from_str(&j)).transpose()?)
    }
}

/// Upserts the vessel row. Takes a plain connection so it can run inside
/// a caller's transaction.
pub(super) fn write_vessel(conn: &Connection, vessel: &VesselState) -> Result<()> {
    let json = serde_json::to_string(vessel)?;
    conn.execute(
        "INSERT INTO vessel (id, version, state) VALUES (1, ?1, ?2)
         ON CONFLICT (id) DO UPDATE SET version = excluded.version, state = excluded.state",
        rusqlite::params![i64::try_from(vessel.version).unwrap_or(i64::MAX), json],
    )?;
    Ok(())
}
