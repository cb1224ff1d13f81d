//! One handler per action kind.
//!
//! Handlers either write an entry now (folding in anything pending), queue
//! a change for the next entry, run the reconciliation pipeline, or hand
//! off to a screen. Text for each entry is fixed before any mutation runs,
//! so it is computed from the live state as it stands.

use jiff::Timestamp;

use crate::catalog::ActionKind;
use crate::deck::Deck;
use crate::model::{
    Autopilot, Emergency, LogEntry, NavStatus, Sail, SailReduction, SevereWeather, TripStatus,
    VesselState,
};
use crate::peripherals::{Notifier, Peripherals};
use crate::queue::{LogDraft, LogQueue};
use crate::reconcile::{self, NO_ACTIVE_TRIP, ReconcileOutcome};
use crate::storage::LogStore;

use super::{ActionOutcome, ActionParams, RuntimeError};

#[allow(clippy::too_many_lines)]
pub(super) async fn dispatch<S: LogStore>(
    deck: &mut Deck<S>,
    peripherals: Peripherals<'_>,
    kind: ActionKind,
    params: ActionParams,
) -> Result<ActionOutcome, RuntimeError> {
    let notifier = peripherals.notifier;
    let outcome = match kind {
        ActionKind::StartTrip => {
            let name = deck.trip().map(|t| t.name.clone()).unwrap_or_default();
            let text = format!("Trip started: {name}");
            transition(deck, notifier, TripStatus::Started, text, |_| {})?
        }
        ActionKind::CastOff => transition(deck, notifier, TripStatus::Underway, "Cast off", |d| {
            d.vessel.nav_status = NavStatus::Underway;
        })?,
        ActionKind::InterruptTrip => {
            let note = params.note.map_or_else(String::new, |n| format!(": {n}"));
            let text = format!("Trip interrupted{note}");
            transition(deck, notifier, TripStatus::Interrupted, text, |_| {})?
        }
        ActionKind::ResumeTrip => {
            transition(deck, notifier, TripStatus::Underway, "Trip resumed", |d| {
                d.vessel.nav_status = NavStatus::Underway;
            })?
        }
        ActionKind::EndTrip => {
            deck.check_transition(TripStatus::Completed {
                completed_at: Timestamp::now(),
            })?;
            // The closing entry has to land while the trip is still open.
            let outcome = log(deck, notifier, "trip", "Trip ended", |_| {})?;
            if matches!(outcome, ActionOutcome::Logged(_)) {
                deck.complete_trip()?;
            }
            outcome
        }

        ActionKind::MotorStart => log(deck, notifier, "propulsion", "Motor started", |d| {
            d.vessel.settle_propulsion(true);
        })?,
        ActionKind::MotorStop => log(deck, notifier, "propulsion", "Motor stopped", |d| {
            d.vessel.settle_propulsion(false);
        })?,
        ActionKind::SetSails | ActionKind::TakeInSails => {
            let set = kind == ActionKind::SetSails;
            let names = chosen_sails(deck.vessel(), kind, params.sail.as_deref(), |s| s.set != set)?;
            let verb = if set { "Set" } else { "Took in" };
            let text = format!("{verb} {}", names.join(", "));
            log(deck, notifier, "sails", text, move |d| {
                let engine = d.vessel.engine_running();
                for name in &names {
                    if let Some(sail) = d.vessel.sail_mut(name) {
                        sail.set = set;
                        if !set {
                            sail.reduction = SailReduction::None;
                        }
                    }
                }
                d.vessel.settle_propulsion(engine);
            })?
        }
        ActionKind::Reef | ActionKind::ShakeOutReef => {
            let reef = kind == ActionKind::Reef;
            let name = chosen_sails(deck.vessel(), kind, params.sail.as_deref(), |s| {
                if reef { s.can_reduce() } else { s.can_shake_out() }
            })?
            .swap_remove(0);
            let mut preview = deck.vessel().sail(&name).cloned();
            if let Some(sail) = preview.as_mut() {
                if reef { sail.reduce() } else { sail.shake_out() }
            }
            let state = preview.map(|s| s.reduction.to_string()).unwrap_or_default();
            let text = format!("{name} {}: {state}", if reef { "reefed" } else { "shaken out" });
            log(deck, notifier, format!("sails.{name}"), text, move |d| {
                if let Some(sail) = d.vessel.sail_mut(&name) {
                    if reef { sail.reduce() } else { sail.shake_out() }
                }
            })?
        }

        ActionKind::Tack | ActionKind::Jibe => {
            let tack = deck.vessel().tack.flipped();
            let verb = if kind == ActionKind::Tack { "Tacked" } else { "Jibed" };
            log(deck, notifier, "manoeuvre", format!("{verb} onto {tack}"), move |d| {
                d.vessel.tack = tack;
            })?
        }
        ActionKind::ChangeCourse => {
            let course = params.course.ok_or(RuntimeError::MissingParameter {
                kind,
                param: "course",
            })?;
            if !(0.0..360.0).contains(&course) {
                return Err(RuntimeError::InvalidParameter {
                    kind,
                    detail: format!("course {course} is outside 0-359"),
                });
            }
            deck.enqueue("nav.course", format!("New course {course:03.0}°"), move |d| {
                d.vessel.heading = Some(course);
            });
            ActionOutcome::Queued
        }

        ActionKind::Moor => log(deck, notifier, "mooring", "Moored", |d| {
            d.vessel.nav_status = NavStatus::Moored;
        })?,
        ActionKind::DropAnchor => log(deck, notifier, "mooring", "Anchor down", |d| {
            d.vessel.nav_status = NavStatus::AtAnchor;
        })?,
        ActionKind::WeighAnchor => log(deck, notifier, "mooring", "Anchor up", |d| {
            d.vessel.nav_status = NavStatus::Underway;
        })?,

        ActionKind::AutopilotOn => {
            let mode = params
                .autopilot
                .filter(|m| *m != Autopilot::Off)
                .unwrap_or(Autopilot::Compass);
            deck.enqueue("autopilot", format!("Autopilot on ({mode})"), move |d| {
                d.vessel.autopilot = mode;
            });
            ActionOutcome::Queued
        }
        ActionKind::AutopilotOff => {
            deck.enqueue("autopilot", "Autopilot off", |d| {
                d.vessel.autopilot = Autopilot::Off;
            });
            ActionOutcome::Queued
        }

        ActionKind::ChangeZone => {
            let zone = params.zone.ok_or(RuntimeError::MissingParameter { kind, param: "zone" })?;
            write_alone(deck, notifier, "nav.zone", format!("Entered {zone}"), move |d| {
                d.vessel.nav_zone = zone;
            })?
        }
        ActionKind::NavigateWaypoint => ActionOutcome::Delegated("waypoint navigation"),

        ActionKind::ReportDanger => {
            let danger = params.danger.ok_or(RuntimeError::MissingParameter {
                kind,
                param: "danger",
            })?;
            log(deck, notifier, "danger", format!("Danger: {danger}"), move |d| {
                if !d.vessel.dangers.contains(&danger) {
                    d.vessel.dangers.push(danger);
                }
            })?
        }
        ActionKind::ClearDanger => match params.danger {
            Some(danger) => log(deck, notifier, "danger", format!("Clear of {danger}"), move |d| {
                d.vessel.dangers.retain(|x| *x != danger);
            })?,
            None => log(deck, notifier, "danger", "All dangers clear", |d| {
                d.vessel.dangers.clear();
            })?,
        },

        ActionKind::DeclareStorm => {
            let weather = params
                .weather
                .filter(|w| *w != SevereWeather::None)
                .unwrap_or(SevereWeather::Storm);
            log(deck, notifier, "weather.severe", format!("Severe weather: {weather}"), move |d| {
                d.vessel.severe_weather = weather;
            })?
        }
        ActionKind::ClearStorm => log(deck, notifier, "weather.severe", "Severe weather over", |d| {
            d.vessel.severe_weather = SevereWeather::None;
        })?,

        ActionKind::ManOverboard => {
            let mut emergency = LogQueue::new();
            emergency.enqueue("emergency", "", |d| {
                d.vessel.emergency = Some(Emergency::ManOverboard);
            });
            match reconcile::log_now_with(deck, peripherals, "MAN OVERBOARD", emergency).await? {
                ReconcileOutcome::Logged(entry) => ActionOutcome::Logged(entry),
                ReconcileOutcome::Aborted => ActionOutcome::Aborted,
            }
        }
        ActionKind::Fire | ActionKind::Medical | ActionKind::OtherEmergency => {
            let (emergency, label) = match kind {
                ActionKind::Fire => (Emergency::Fire, "FIRE"),
                ActionKind::Medical => (Emergency::Medical, "MEDICAL EMERGENCY"),
                _ => (Emergency::Other, "EMERGENCY"),
            };
            let text = match params.note {
                Some(note) => format!("{label}: {note}"),
                None => label.to_string(),
            };
            log(deck, notifier, "emergency", text, move |d| {
                d.vessel.emergency = Some(emergency);
            })?
        }
        ActionKind::EndEmergency => log(deck, notifier, "emergency", "Emergency over", |d| {
            d.vessel.emergency = None;
        })?,

        ActionKind::ReportFailure => {
            let note = required_note(kind, params.note)?;
            let failure = note.clone();
            log(deck, notifier, "failure", format!("Failure: {note}"), move |d| {
                d.vessel.failure = Some(failure.clone());
            })?
        }
        ActionKind::ManualLog => {
            let note = required_note(kind, params.note)?;
            log(deck, notifier, "note", note, |_| {})?
        }
        ActionKind::LogPosition => match reconcile::log_now(deck, peripherals, "Position").await? {
            ReconcileOutcome::Logged(entry) => ActionOutcome::Logged(entry),
            ReconcileOutcome::Aborted => ActionOutcome::Aborted,
        },
        ActionKind::LogWeather => {
            let force = params.beaufort.ok_or(RuntimeError::MissingParameter {
                kind,
                param: "beaufort force",
            })?;
            if force > 12 {
                return Err(RuntimeError::InvalidParameter {
                    kind,
                    detail: format!("force {force} is beyond 12"),
                });
            }
            let text = match params.note {
                Some(note) => format!("Wind {force} Bft, {note}"),
                None => format!("Wind {force} Bft"),
            };
            log(deck, notifier, "weather", text, move |d| {
                d.vessel.beaufort = force;
            })?
        }
        ActionKind::ChangeWatch => {
            let crew = params.note.ok_or(RuntimeError::MissingParameter {
                kind,
                param: "crew name",
            })?;
            deck.enqueue("crew.watch", format!("Watch: {crew}"), |_| {});
            ActionOutcome::Queued
        }

        ActionKind::EditSettings => ActionOutcome::Delegated("settings"),
    };
    Ok(outcome)
}

/// Writes one entry now, folding in everything pending.
fn log<S: LogStore>(
    deck: &mut Deck<S>,
    notifier: &dyn Notifier,
    key: impl Into<String>,
    text: impl Into<String>,
    apply: impl Fn(&mut LogDraft) + Send + 'static,
) -> Result<ActionOutcome, RuntimeError> {
    let entry = deck.write_now(true, None, key, text, apply)?;
    Ok(written(entry, notifier))
}

/// Logs a trip step, then moves the trip.
///
/// The step is checked first so an illegal one writes nothing, and the
/// trip only moves once its entry is stored.
fn transition<S: LogStore>(
    deck: &mut Deck<S>,
    notifier: &dyn Notifier,
    next: TripStatus,
    text: impl Into<String>,
    apply: impl Fn(&mut LogDraft) + Send + 'static,
) -> Result<ActionOutcome, RuntimeError> {
    deck.check_transition(next)?;
    let outcome = log(deck, notifier, "trip", text, apply)?;
    if matches!(outcome, ActionOutcome::Logged(_)) {
        deck.advance_trip(next)?;
    }
    Ok(outcome)
}

/// Writes one entry now, leaving anything pending queued.
fn write_alone<S: LogStore>(
    deck: &mut Deck<S>,
    notifier: &dyn Notifier,
    key: impl Into<String>,
    text: impl Into<String>,
    apply: impl Fn(&mut LogDraft) + Send + 'static,
) -> Result<ActionOutcome, RuntimeError> {
    let entry = deck.write_now(false, None, key, text, apply)?;
    Ok(written(entry, notifier))
}

fn written(entry: Option<LogEntry>, notifier: &dyn Notifier) -> ActionOutcome {
    match entry {
        Some(entry) => ActionOutcome::Logged(entry),
        None => {
            notifier.notify(NO_ACTIVE_TRIP);
            ActionOutcome::Aborted
        }
    }
}

fn required_note(kind: ActionKind, note: Option<String>) -> Result<String, RuntimeError> {
    note.filter(|n| !n.trim().is_empty())
        .ok_or(RuntimeError::MissingParameter { kind, param: "note" })
}

/// The named sail, or every sail matching `eligible` when none is named.
fn chosen_sails(
    state: &VesselState,
    kind: ActionKind,
    named: Option<&str>,
    eligible: impl Fn(&Sail) -> bool,
) -> Result<Vec<String>, RuntimeError> {
    if let Some(name) = named {
        return match state.sail(name) {
            Some(sail) if eligible(sail) => Ok(vec![sail.name.clone()]),
            Some(sail) => Err(RuntimeError::InvalidParameter {
                kind,
                detail: format!("{} cannot do that right now", sail.name),
            }),
            None => Err(RuntimeError::InvalidParameter {
                kind,
                detail: format!("no sail named {name}"),
            }),
        };
    }
    let names: Vec<String> = state
        .sails
        .iter()
        .filter(|s| eligible(s))
        .map(|s| s.name.clone())
        .collect();
    if names.is_empty() {
        return Err(RuntimeError::NotAvailable(kind));
    }
    Ok(names)
}
