//! Deck commands: situation, actions, fire, log.

use clap::Args;

use crate::catalog::{ActionKind, Catalog};
use crate::deck::Deck;
use crate::model::{Autopilot, Danger, NavZone, SevereWeather};
use crate::peripherals::Peripherals;
use crate::reconcile::{self, ReconcileOutcome};
use crate::runtime::{ActionOutcome, ActionParams, ActionRuntime};
use crate::storage::LogStore;

use super::format::{format_definitions, format_entry, format_vessel};

#[derive(Debug, Args)]
pub struct FireArgs {
    /// Action tag, as listed by `shiplog actions`.
    tag: String,

    /// Free text: manual entries, watch handovers, failures, other emergencies.
    #[arg(long)]
    note: Option<String>,

    /// Sail to act on. Without it, every sail the action applies to.
    #[arg(long)]
    sail: Option<String>,

    /// Danger to report or clear.
    #[arg(long)]
    danger: Option<Danger>,

    /// New course, degrees.
    #[arg(long)]
    course: Option<f64>,

    /// Navigation zone entered.
    #[arg(long)]
    zone: Option<NavZone>,

    /// Observed wind force.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=12))]
    beaufort: Option<u8>,

    /// Autopilot mode to engage.
    #[arg(long)]
    autopilot: Option<Autopilot>,

    /// Kind of severe weather.
    #[arg(long)]
    weather: Option<SevereWeather>,
}

impl FireArgs {
    fn kind(&self) -> Result<ActionKind, String> {
        Catalog::variant(&self.tag)
            .map(|d| d.kind)
            .ok_or_else(|| format!("unknown action '{}' (see `shiplog actions`)", self.tag))
    }

    fn into_params(self) -> ActionParams {
        ActionParams {
            note: self.note,
            sail: self.sail,
            danger: self.danger,
            course: self.course,
            zone: self.zone,
            beaufort: self.beaufort,
            autopilot: self.autopilot,
            weather: self.weather,
        }
    }
}

pub(super) fn cmd_situation<S: LogStore>(deck: &Deck<S>) -> Result<(), String> {
    let situation = deck.situation();
    if situation.is_emergency() {
        println!("Situation  {situation}  *** EMERGENCY ***");
    } else {
        println!("Situation  {situation}");
    }
    match deck.trip() {
        Some(trip) => println!("Trip       {} [{}]", trip.name, trip.status.label()),
        None => println!("Trip       none"),
    }
    for line in format_vessel(deck.vessel()) {
        println!("{line}");
    }
    let pending = deck.queue().len();
    if pending > 0 {
        println!("Pending    {pending} change(s) for the next entry");
    }
    Ok(())
}

pub(super) fn cmd_actions<S: LogStore>(
    deck: &Deck<S>,
    tags: &[String],
    json: bool,
) -> Result<(), String> {
    if !tags.is_empty() {
        let definitions = Catalog::definitions(tags);
        if json {
            let json = serde_json::to_string_pretty(&definitions)
                .map_err(|e| format!("failed to serialize actions: {e}"))?;
            println!("{json}");
        } else {
            for line in format_definitions(&definitions) {
                println!("{line}");
            }
        }
        return Ok(());
    }

    let available = Catalog::available(deck.situation(), &deck.context());
    if json {
        let json = serde_json::to_string_pretty(&available)
            .map_err(|e| format!("failed to serialize actions: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    println!("Always:");
    for line in format_definitions(&available.global) {
        println!("{line}");
    }
    if !available.situational.is_empty() {
        println!("{}:", deck.situation());
        for line in format_definitions(&available.situational) {
            println!("{line}");
        }
    }
    Ok(())
}

pub(super) async fn cmd_fire<S: LogStore>(
    deck: Deck<S>,
    peripherals: Peripherals<'_>,
    args: FireArgs,
) -> Result<(), String> {
    let kind = args.kind()?;
    let runtime = ActionRuntime::new(deck, peripherals);
    let outcome = runtime
        .fire(kind, args.into_params())
        .await
        .map_err(|e| e.to_string())?;

    match outcome {
        ActionOutcome::Logged(entry) => println!("{}", format_entry(&entry)),
        ActionOutcome::Queued => eprintln!("{} queued for the next entry", kind.title()),
        ActionOutcome::Aborted => {}
        ActionOutcome::Delegated(screen) => {
            eprintln!("{} is handled by the {screen} screen", kind.title());
        }
    }

    let mut deck = runtime.into_deck();
    flush_pending(&mut deck)
}

pub(super) async fn cmd_log<S: LogStore>(
    deck: &mut Deck<S>,
    peripherals: Peripherals<'_>,
    header: &str,
) -> Result<(), String> {
    let outcome = reconcile::log_now(deck, peripherals, header)
        .await
        .map_err(|e| format!("failed to log: {e}"))?;
    if let ReconcileOutcome::Logged(entry) = outcome {
        println!("{}", format_entry(&entry));
    }
    Ok(())
}

/// Writes whatever is still queued, since the queue does not outlive the process.
fn flush_pending<S: LogStore>(deck: &mut Deck<S>) -> Result<(), String> {
    if deck.queue().is_empty() {
        return Ok(());
    }
    let flushed = deck
        .flush(None)
        .map_err(|e| format!("failed to write queued changes: {e}"))?;
    match flushed {
        Some(entry) => println!("{}", format_entry(&entry)),
        None => {
            tracing::warn!(pending = deck.queue().len(), "queued changes dropped, no active trip");
            deck.discard_pending();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;

    use crate::cli::{Cli, Command};
    use crate::model::TripStatus;
    use crate::reconcile::fakes::Rig;
    use crate::storage::MemoryStore;

    fn fire_args(argv: &[&str]) -> FireArgs {
        let mut full = vec!["shiplog", "fire"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Fire(args) => args,
            other => panic!("expected fire, got {other:?}"),
        }
    }

    fn underway_deck() -> Deck<MemoryStore> {
        let mut deck = Deck::open(MemoryStore::default()).unwrap();
        deck.open_trip("Test").unwrap();
        deck.advance_trip(TripStatus::Started).unwrap();
        deck.advance_trip(TripStatus::Underway).unwrap();
        deck
    }

    #[test]
    fn params_come_from_flags() {
        let args = fire_args(&[
            "danger.report",
            "--danger",
            "shallows",
            "--note",
            "Sandbank off the point",
        ]);
        assert_eq!(args.kind().unwrap(), ActionKind::ReportDanger);

        let params = args.into_params();
        assert_eq!(params.danger, Some(Danger::Shallows));
        assert_eq!(params.note.as_deref(), Some("Sandbank off the point"));
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let err = fire_args(&["sails.hoist-spinnaker"]).kind().unwrap_err();
        assert!(err.contains("unknown action"));
    }

    #[test]
    fn beaufort_is_range_checked() {
        let argv = ["shiplog", "fire", "log.weather", "--beaufort", "13"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn queued_change_is_written_before_exit() {
        let mut deck = underway_deck();
        deck.enqueue("autopilot", "Autopilot on (compass)", |d| {
            d.vessel.autopilot = Autopilot::Compass;
        });

        flush_pending(&mut deck).unwrap();

        assert!(deck.queue().is_empty());
        assert_eq!(deck.store().entry_count(), 1);
        assert_eq!(deck.vessel().autopilot, Autopilot::Compass);
    }

    #[test]
    fn queue_without_trip_is_dropped() {
        let mut deck = Deck::open(MemoryStore::default()).unwrap();
        deck.enqueue("autopilot", "Autopilot on (compass)", |d| {
            d.vessel.autopilot = Autopilot::Compass;
        });

        flush_pending(&mut deck).unwrap();

        assert!(deck.queue().is_empty());
        assert_eq!(deck.store().entry_count(), 0);
    }

    #[tokio::test]
    async fn fire_through_the_cli_path() {
        let rig = Rig::new();
        let deck = underway_deck();

        cmd_fire(deck, rig.peripherals(), fire_args(&["motor.start"]))
            .await
            .unwrap();
    }
}
