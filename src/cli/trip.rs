//! Trip commands: new, list, entries.

use clap::Subcommand;

use crate::deck::Deck;
use crate::storage::LogStore;

use super::format::{format_entry, format_trip, short_id};
use super::resolve_trip;

#[derive(Debug, Subcommand)]
pub enum TripCommand {
    /// Open a new trip and make it the active one. Prints the trip ID.
    ///
    /// The trip starts out in `preparing`; fire `trip.start` when ready.
    New {
        /// Trip name, e.g. "Kiel to Sønderborg".
        name: String,
    },

    /// List trips, oldest first. The active trip is marked with `*`.
    List,

    /// Print the log entries of a trip, oldest first.
    Entries {
        /// Trip ID: full UUID or unambiguous prefix. Defaults to the active trip.
        #[arg(long)]
        trip: Option<String>,
    },
}

pub(super) fn run<S: LogStore>(deck: &mut Deck<S>, command: TripCommand) -> Result<(), String> {
    match command {
        TripCommand::New { name } => cmd_new(deck, &name),
        TripCommand::List => cmd_list(deck),
        TripCommand::Entries { trip } => cmd_entries(deck, trip.as_deref()),
    }
}

fn cmd_new<S: LogStore>(deck: &mut Deck<S>, name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("a trip needs a name".to_string());
    }
    if let Some(active) = deck.active_trip() {
        return Err(format!(
            "trip {} ({}) is still active, end it first",
            short_id(active.id),
            active.name
        ));
    }

    let trip = deck
        .open_trip(name)
        .map_err(|e| format!("failed to create trip: {e}"))?;
    println!("{}", trip.id);
    Ok(())
}

fn cmd_list<S: LogStore>(deck: &Deck<S>) -> Result<(), String> {
    let trips = deck
        .store()
        .list_trips()
        .map_err(|e| format!("failed to list trips: {e}"))?;

    if trips.is_empty() {
        println!("No trips");
        return Ok(());
    }

    let active = deck.active_trip().map(|t| t.id);
    for trip in &trips {
        println!("{}", format_trip(trip, Some(trip.id) == active));
    }
    Ok(())
}

fn cmd_entries<S: LogStore>(deck: &Deck<S>, reference: Option<&str>) -> Result<(), String> {
    let trip = match reference {
        Some(reference) => resolve_trip(deck.store(), reference)?,
        None => deck
            .trip()
            .cloned()
            .ok_or("no active trip, pass --trip <id>")?,
    };

    let entries = deck
        .store()
        .entries(trip.id)
        .map_err(|e| format!("failed to read entries: {e}"))?;

    println!("{}", format_trip(&trip, trip.is_active()));
    if entries.is_empty() {
        println!("No entries");
    }
    for entry in &entries {
        println!("{}", format_entry(entry));
    }
    Ok(())
}
