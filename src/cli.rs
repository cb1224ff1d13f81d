//! CLI interface for shiplog.
//!
//! Each subcommand is one-shot: it opens the logbook, does its work, and
//! exits. Changes that would normally wait in the log queue for the next
//! entry are written as their own entry before the process ends.
//!
//! - `shiplog trip new|list|entries`: trip lifecycle and history.
//! - `shiplog situation`, `shiplog actions`: what the boat is doing and
//!   what is on offer.
//! - `shiplog fire <tag>`: fire one catalog action.
//! - `shiplog log`: reconcile position and write an entry.
//! - `shiplog set`: adjust the live vessel state without logging.
//!
//! `--lat`/`--lon` stand in for the device's position receiver.

mod fire;
mod format;
mod set;
mod trip;

use clap::{ArgAction, Parser, Subcommand};
use uuid::Uuid;

use crate::config::Config;
use crate::deck::Deck;
use crate::model::{Coordinate, Trip};
use crate::peripherals::{
    FixedLocator, Peripherals, SnapshotFile, StderrNotifier, TerminalPrompt,
};
use crate::storage::{LogStore, Storage};

pub use fire::FireArgs;
pub use set::SetArgs;
pub use trip::TripCommand;

/// Shiplog: the vessel's logbook.
#[derive(Debug, Parser)]
#[command(name = "shiplog", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// More log output on stderr (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Latitude the position receiver reports, decimal degrees.
    #[arg(long, global = true, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude the position receiver reports, decimal degrees.
    #[arg(long, global = true, allow_negative_numbers = true)]
    lon: Option<f64>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: a day sail
  1. shiplog trip new "Kiel to Sønderborg"
  2. shiplog fire trip.start
  3. shiplog fire motor.start
  4. shiplog --lat 54.32 --lon 10.14 fire trip.cast-off
  5. shiplog fire sails.set --sail main
  6. shiplog --lat 54.61 --lon 10.02 log
  7. shiplog fire trip.end

Situation and actions:
  shiplog situation
  shiplog actions --json"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage trips: open a new one, list them, read back entries.
    Trip {
        #[command(subcommand)]
        command: TripCommand,
    },

    /// Show the current situation and the vessel state behind it.
    Situation,

    /// List the actions on offer right now.
    Actions {
        /// Describe these tags instead, whether on offer or not.
        tags: Vec<String>,

        /// Print the catalog JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Fire one action by tag, e.g. `motor.start` or `sails.reef`.
    ///
    /// Prints the entry it wrote, if any.
    Fire(FireArgs),

    /// Reconcile position, course and wind, and write one entry.
    Log {
        /// First line of the entry.
        #[arg(long, default_value = "Position")]
        header: String,
    },

    /// Adjust the live vessel state. Nothing is logged.
    Set(SetArgs),
}

/// Run the CLI, returning an error message on failure.
pub async fn run(cli: Cli, config: &Config, storage: Storage) -> Result<(), String> {
    let mut deck =
        Deck::open(storage).map_err(|e| format!("failed to open logbook: {e}"))?;
    seed_wardrobe(&mut deck, config)?;

    let sensors = SnapshotFile::new(config.sensor_snapshot.clone());
    let locator = FixedLocator::new(device_position(cli.lat, cli.lon)?);
    let prompt = TerminalPrompt;
    let notifier = StderrNotifier;
    let peripherals = Peripherals {
        sensors: &sensors,
        locator: &locator,
        prompt: &prompt,
        notifier: &notifier,
    };

    match cli.command {
        Command::Trip { command } => trip::run(&mut deck, command),
        Command::Situation => fire::cmd_situation(&deck),
        Command::Actions { tags, json } => fire::cmd_actions(&deck, &tags, json),
        Command::Fire(args) => fire::cmd_fire(deck, peripherals, args).await,
        Command::Log { header } => fire::cmd_log(&mut deck, peripherals, &header).await,
        Command::Set(args) => set::cmd_set(&mut deck, &args),
    }
}

fn device_position(lat: Option<f64>, lon: Option<f64>) -> Result<Option<Coordinate>, String> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(format!("position {lat}, {lon} is out of range"));
            }
            Ok(Some(Coordinate::new(lat, lon)))
        }
        (None, None) => Ok(None),
        _ => Err("--lat and --lon go together".to_string()),
    }
}

/// Gives a vessel with no sails the configured wardrobe.
fn seed_wardrobe(deck: &mut Deck<Storage>, config: &Config) -> Result<(), String> {
    if !deck.vessel().sails.is_empty() || config.sails.is_empty() {
        return Ok(());
    }
    let wardrobe = config.wardrobe();
    tracing::info!(sails = wardrobe.len(), "seeding sail wardrobe from config");
    deck.adjust(|v| v.sails = wardrobe)
        .map_err(|e| format!("failed to seed sails: {e}"))
}

/// Resolve a trip reference (full UUID or unambiguous prefix) to a trip.
fn resolve_trip<S: LogStore>(store: &S, reference: &str) -> Result<Trip, String> {
    if let Ok(id) = reference.parse::<Uuid>() {
        return store
            .load_trip(id)
            .map_err(|e| format!("trip not found: {e}"));
    }

    let trips = store
        .list_trips()
        .map_err(|e| format!("failed to list trips: {e}"))?;
    let matches: Vec<_> = trips
        .iter()
        .filter(|t| t.id.to_string().starts_with(reference))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no trip matching '{reference}'")),
        [trip] => Ok((*trip).clone()),
        many => {
            let ids: Vec<String> = many.iter().map(|t| format::short_id(t.id)).collect();
            Err(format!(
                "'{reference}' is ambiguous, matches {} trips: {}",
                many.len(),
                ids.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    use crate::storage::MemoryStore;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn negative_position_parses() {
        let cli =
            Cli::try_parse_from(["shiplog", "log", "--lat", "-33.9", "--lon", "18.4"]).unwrap();
        let position = device_position(cli.lat, cli.lon).unwrap().unwrap();
        assert!((position.lat + 33.9).abs() < 1e-9);
        assert!(matches!(cli.command, Command::Log { ref header } if header == "Position"));
    }

    #[test]
    fn position_needs_both_halves() {
        assert!(device_position(Some(54.3), None).is_err());
        assert!(device_position(Some(91.0), Some(10.0)).is_err());
        assert_eq!(device_position(None, None), Ok(None));
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["shiplog", "-vv", "situation"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn trip_prefix_resolution() {
        let store = MemoryStore::default();
        let trip = Trip::new("Kiel to Sønderborg");
        store.create_trip(&trip).unwrap();

        let prefix = &trip.id.to_string()[..6];
        assert_eq!(resolve_trip(&store, prefix).unwrap().id, trip.id);
        assert_eq!(resolve_trip(&store, &trip.id.to_string()).unwrap().id, trip.id);
        assert!(resolve_trip(&store, "zzz").is_err());
    }
}
