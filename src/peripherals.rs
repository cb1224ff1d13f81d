//! Collaborators the logbook consumes but does not own.
//!
//! The pipeline only sees these traits. The concrete types at the bottom
//! back the command-line surface: a JSON snapshot file for the instrument
//! feed, a fixed position for the device receiver, the terminal for the
//! heading prompt, and stderr for notices.

use std::cell::Cell;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use jiff::Timestamp;

use crate::model::{Coordinate, Fix, FixSource, SensorSnapshot};

/// A boxed future borrowed from its collaborator.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// The external instrument feed.
pub trait SensorFeed {
    /// The latest snapshot, or `None` when the feed is absent.
    fn snapshot(&self) -> Option<SensorSnapshot>;
}

/// The device's own position receiver.
pub trait DeviceLocator {
    /// Requests one fix. Completes with `None` if the receiver has nothing.
    fn request_fix(&self) -> BoxFuture<'_, Option<Fix>>;
}

/// A single-line prompt to the operator.
pub trait OperatorPrompt {
    /// Returns the operator's answer, or `None` if they cancelled.
    fn ask<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Option<String>>;
}

/// Fire-and-forget banner messages.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Everything a reconciliation run talks to besides the deck.
#[derive(Clone, Copy)]
pub struct Peripherals<'a> {
    pub sensors: &'a dyn SensorFeed,
    pub locator: &'a dyn DeviceLocator,
    pub prompt: &'a dyn OperatorPrompt,
    pub notifier: &'a dyn Notifier,
}

/// Reads the instrument snapshot from a JSON file on every call.
///
/// A missing or unreadable file means the feed is absent.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: Option<PathBuf>,
}

impl SnapshotFile {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl SensorFeed for SnapshotFile {
    fn snapshot(&self) -> Option<SensorSnapshot> {
        let path = self.path.as_ref()?;
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no sensor snapshot");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed sensor snapshot");
                None
            }
        }
    }
}

/// A single reading typed in by the operator, stamped when first asked for.
///
/// Only the first request gets it. Repeating one coordinate would look
/// like a stopped vessel to anything measuring between two fixes.
#[derive(Debug, Default)]
pub struct FixedLocator {
    position: Cell<Option<Coordinate>>,
}

impl FixedLocator {
    pub fn new(position: Option<Coordinate>) -> Self {
        Self {
            position: Cell::new(position),
        }
    }
}

impl DeviceLocator for FixedLocator {
    fn request_fix(&self) -> BoxFuture<'_, Option<Fix>> {
        let fix = self
            .position
            .take()
            .map(|c| Fix::new(Timestamp::now(), c, FixSource::Device));
        Box::pin(async move { fix })
    }
}

/// Asks on the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl OperatorPrompt for TerminalPrompt {
    fn ask<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Option<String>> {
        let message = message.to_string();
        Box::pin(async move {
            // dialoguer blocks on stdin.
            let answer = tokio::task::spawn_blocking(move || {
                dialoguer::Input::<String>::new()
                    .with_prompt(message)
                    .allow_empty(true)
                    .interact_text()
            })
            .await;
            match answer {
                Ok(Ok(text)) if !text.trim().is_empty() => Some(text),
                Ok(Ok(_)) => None,
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "prompt failed");
                    None
                }
                Err(e) => {
                    tracing::warn!(error = %e, "prompt task failed");
                    None
                }
            }
        })
    }
}

/// Prints notices to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        tracing::info!(notice = message, "operator notified");
        eprintln!("» {message}");
    }
}
