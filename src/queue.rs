//! Deferred log queue: pending log-field mutations, flushed as one entry.
//!
//! Mutations are keyed. Enqueuing an existing key replaces its text and
//! apply function but keeps its original slot, so iteration order is
//! first-seen position with last-write-wins values.
//!
//! A flush is all-or-nothing. Every pending mutation is applied to a draft
//! copy of the vessel state; the draft becomes one log entry and the new
//! live state in a single store commit. If there is no active trip the
//! flush does nothing and the queue stays as it was.

use std::fmt;

use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{Coordinate, LogEntry, NavSnapshot, Trip, VesselState};
use crate::storage::{self, LogStore};

/// What a mutation edits: the entry-to-be and the state it will leave behind.
#[derive(Debug, Clone)]
pub struct LogDraft {
    /// Defaults to the time of the flush.
    pub logged_at: Timestamp,

    /// Defaults to the vessel's position.
    pub position: Option<Coordinate>,

    /// Becomes the live vessel state once the entry is stored.
    pub vessel: VesselState,
}

/// The side effect of one pending mutation.
pub type Apply = Box<dyn Fn(&mut LogDraft) + Send>;

/// One pending change to the next log entry.
pub struct PendingLogMutation {
    pub key: String,
    pub text: String,
    apply: Apply,
}

impl fmt::Debug for PendingLogMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLogMutation")
            .field("key", &self.key)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

/// Ordered, key-deduplicating accumulator of pending mutations.
#[derive(Debug, Default)]
pub struct LogQueue {
    pending: Vec<PendingLogMutation>,
}

impl LogQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a mutation, replacing any pending one with the same key in place.
    pub fn enqueue(
        &mut self,
        key: impl Into<String>,
        text: impl Into<String>,
        apply: impl Fn(&mut LogDraft) + Send + 'static,
    ) {
        let mutation = PendingLogMutation {
            key: key.into(),
            text: text.into(),
            apply: Box::new(apply),
        };
        match self.pending.iter_mut().find(|m| m.key == mutation.key) {
            Some(slot) => {
                tracing::debug!(key = %mutation.key, "replacing pending log mutation");
                *slot = mutation;
            }
            None => self.pending.push(mutation),
        }
    }

    pub fn pending(&self) -> &[PendingLogMutation] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops everything pending without writing.
    pub fn discard(&mut self) {
        self.pending.clear();
    }

    /// Commits every pending mutation as one log entry.
    ///
    /// Returns `Ok(None)` without touching anything when there is no active
    /// trip, or when there is nothing to write (empty queue, no header).
    /// On a store error the live state and the queue are left unchanged.
    pub fn flush<S: LogStore + ?Sized>(
        &mut self,
        header: Option<&str>,
        vessel: &mut VesselState,
        trip: Option<&Trip>,
        store: &S,
    ) -> storage::Result<Option<LogEntry>> {
        let Some(trip_id) = active_trip_id(vessel, trip) else {
            tracing::info!(pending = self.len(), "no active trip, flush skipped");
            return Ok(None);
        };
        if self.pending.is_empty() && header.is_none() {
            return Ok(None);
        }

        let staged: Vec<&PendingLogMutation> = self.pending.iter().collect();
        let entry = commit(&staged, header, trip_id, vessel, store)?;
        self.pending.clear();
        Ok(Some(entry))
    }

    /// Applies one more mutation and commits, all as one entry.
    ///
    /// With `flush_pending` the queued mutations are folded in first and the
    /// queue is emptied. Without it they stay queued for a later flush.
    #[allow(clippy::too_many_arguments)]
    pub fn write_now<S: LogStore + ?Sized>(
        &mut self,
        flush_pending: bool,
        header: Option<&str>,
        key: impl Into<String>,
        text: impl Into<String>,
        apply: impl Fn(&mut LogDraft) + Send + 'static,
        vessel: &mut VesselState,
        trip: Option<&Trip>,
        store: &S,
    ) -> storage::Result<Option<LogEntry>> {
        let extra = PendingLogMutation {
            key: key.into(),
            text: text.into(),
            apply: Box::new(apply),
        };
        let Some(trip_id) = active_trip_id(vessel, trip) else {
            tracing::info!(key = %extra.key, "no active trip, write skipped");
            return Ok(None);
        };

        if !flush_pending {
            return commit(&[&extra], header, trip_id, vessel, store).map(Some);
        }

        let entry = commit(
            &self.merged(std::slice::from_ref(&extra)),
            header,
            trip_id,
            vessel,
            store,
        )?;
        self.pending.clear();
        Ok(Some(entry))
    }

    /// Commits the queue with a batch of further mutations, all as one entry.
    ///
    /// `extra` wins where keys collide. The batch is consumed either way:
    /// when nothing is written (no active trip, or a store error) none of
    /// it reaches the queue, and the queue itself is left as it was.
    pub fn flush_with<S: LogStore + ?Sized>(
        &mut self,
        header: Option<&str>,
        extra: LogQueue,
        vessel: &mut VesselState,
        trip: Option<&Trip>,
        store: &S,
    ) -> storage::Result<Option<LogEntry>> {
        let Some(trip_id) = active_trip_id(vessel, trip) else {
            tracing::info!(dropped = extra.len(), "no active trip, flush skipped");
            return Ok(None);
        };
        if self.pending.is_empty() && extra.is_empty() && header.is_none() {
            return Ok(None);
        }

        let entry = commit(&self.merged(&extra.pending), header, trip_id, vessel, store)?;
        self.pending.clear();
        Ok(Some(entry))
    }

    /// The pending list as a commit sees it with `extra` staged on top:
    /// colliding keys keep their slot, new keys go last. The queue itself
    /// is not touched, so a failed commit leaves it intact.
    fn merged<'a>(&'a self, extra: &'a [PendingLogMutation]) -> Vec<&'a PendingLogMutation> {
        let mut staged: Vec<&PendingLogMutation> = self.pending.iter().collect();
        for mutation in extra {
            match staged.iter().position(|m| m.key == mutation.key) {
                Some(slot) => staged[slot] = mutation,
                None => staged.push(mutation),
            }
        }
        staged
    }
}

/// The trip a flush would write against, if it is active and matches the vessel.
fn active_trip_id(vessel: &VesselState, trip: Option<&Trip>) -> Option<Uuid> {
    trip.filter(|t| t.is_active() && vessel.active_trip == Some(t.id))
        .map(|t| t.id)
}

fn commit<S: LogStore + ?Sized>(
    pending: &[&PendingLogMutation],
    header: Option<&str>,
    trip_id: Uuid,
    vessel: &mut VesselState,
    store: &S,
) -> storage::Result<LogEntry> {
    let mut draft = LogDraft {
        logged_at: Timestamp::now(),
        position: vessel.position,
        vessel: vessel.clone(),
    };
    for mutation in pending {
        (mutation.apply)(&mut draft);
    }
    draft.vessel.version = vessel.version + 1;

    let entry = LogEntry {
        id: Uuid::new_v4(),
        trip_id,
        logged_at: draft.logged_at,
        position: draft.position,
        text: compose_text(header, pending),
        snapshot: NavSnapshot::from(&draft.vessel),
    };
    store.commit(&entry, &draft.vessel)?;

    tracing::info!(
        entry = %entry.id,
        mutations = pending.len(),
        version = draft.vessel.version,
        "log entry committed"
    );
    *vessel = draft.vessel;
    Ok(entry)
}

/// `"Header: first; second"`, skipping empty descriptions.
fn compose_text(header: Option<&str>, pending: &[&PendingLogMutation]) -> String {
    let body = pending
        .iter()
        .map(|m| m.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("; ");
    match header {
        Some(h) if body.is_empty() => h.to_string(),
        Some(h) => format!("{h}: {body}"),
        None => body,
    }
}
