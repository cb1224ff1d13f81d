//! Trip types: the voyage window that owns log entries.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A voyage window. Log entries are written against exactly one trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub name: String,
    pub created_at: Timestamp,
    pub status: TripStatus,
}

/// Where a trip stands in its lifecycle.
///
/// ```text
/// preparing → started → underway ⇄ interrupted → completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TripStatus {
    /// Crew briefing, checks, provisioning.
    Preparing,

    /// Trip opened, still alongside.
    Started,

    /// Lines are off.
    Underway,

    /// Temporarily paused (overnight stop, weather hold).
    Interrupted,

    /// Back in port, logbook sealed.
    Completed { completed_at: Timestamp },
}

impl TripStatus {
    /// Short lowercase label, used for storage and display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Preparing => "preparing",
            Self::Started => "started",
            Self::Underway => "underway",
            Self::Interrupted => "interrupted",
            Self::Completed { .. } => "completed",
        }
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step.
    pub fn can_become(&self, next: &TripStatus) -> bool {
        matches!(
            (self, next),
            (Self::Preparing, Self::Started)
                | (Self::Started | Self::Interrupted, Self::Underway)
                | (Self::Underway, Self::Interrupted)
                | (
                    Self::Preparing | Self::Started | Self::Underway | Self::Interrupted,
                    Self::Completed { .. }
                )
        )
    }
}

impl Trip {
    /// Opens a new trip in the `Preparing` state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Timestamp::now(),
            status: TripStatus::Preparing,
        }
    }

    /// A trip is active until it is completed.
    pub fn is_active(&self) -> bool {
        !matches!(self.status, TripStatus::Completed { .. })
    }

    /// Moves the trip to `next`, or returns the rejected pair.
    pub fn advance(&mut self, next: TripStatus) -> Result<(), (TripStatus, TripStatus)> {
        if !self.status.can_become(&next) {
            return Err((self.status, next));
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_lifecycle() {
        let mut trip = Trip::new("Kiel to Sønderborg");
        trip.advance(TripStatus::Started).unwrap();
        trip.advance(TripStatus::Underway).unwrap();
        trip.advance(TripStatus::Interrupted).unwrap();
        trip.advance(TripStatus::Underway).unwrap();
        trip.advance(TripStatus::Completed {
            completed_at: Timestamp::now(),
        })
        .unwrap();

        assert!(!trip.is_active());
    }

    #[test]
    fn cannot_skip_start() {
        let mut trip = Trip::new("Day sail");
        let err = trip.advance(TripStatus::Underway).unwrap_err();

        assert_eq!(err, (TripStatus::Preparing, TripStatus::Underway));
        assert_eq!(trip.status, TripStatus::Preparing);
    }

    #[test]
    fn completed_is_terminal() {
        let mut trip = Trip::new("Day sail");
        trip.advance(TripStatus::Completed {
            completed_at: Timestamp::now(),
        })
        .unwrap();

        assert!(trip.advance(TripStatus::Started).is_err());
        assert!(
            trip.advance(TripStatus::Completed {
                completed_at: Timestamp::now(),
            })
            .is_err()
        );
    }
}
