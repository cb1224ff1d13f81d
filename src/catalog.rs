//! Action catalog: which actions exist, and which are on offer right now.
//!
//! The catalog is static data. Each [`ActionKind`] knows its tag, display
//! metadata, and visibility predicate; each [`Situation`] maps to a fixed,
//! ordered list of kinds. Firing an action never touches the catalog.

mod action;
mod situations;

use serde::Serialize;

use crate::model::{Situation, Trip, VesselState};

pub use action::{ActionKind, Category};

/// The live state an action's visibility is judged against.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub state: &'a VesselState,
    pub trip: Option<&'a Trip>,
}

impl<'a> ActionContext<'a> {
    pub fn new(state: &'a VesselState, trip: Option<&'a Trip>) -> Self {
        Self { state, trip }
    }
}

/// Display-ready description of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    pub kind: ActionKind,
    pub tag: &'static str,
    pub title: &'static str,
    pub symbol: &'static str,
    pub category: Category,
}

impl ActionDefinition {
    pub fn is_visible(&self, ctx: &ActionContext<'_>) -> bool {
        self.kind.is_visible(ctx)
    }
}

impl From<ActionKind> for ActionDefinition {
    fn from(kind: ActionKind) -> Self {
        Self {
            kind,
            tag: kind.tag(),
            title: kind.title(),
            symbol: kind.symbol(),
            category: kind.category(),
        }
    }
}

/// The actions on offer for one moment, split the way the UI shows them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Available {
    /// The fixed bar, minus anything invisible.
    pub global: Vec<ActionDefinition>,

    /// Situation-specific actions not already on the global bar.
    pub situational: Vec<ActionDefinition>,
}

/// Lookup over the static action registry.
pub struct Catalog;

impl Catalog {
    /// Definitions for the given tags, in order. Unknown tags are skipped.
    pub fn definitions<S: AsRef<str>>(tags: &[S]) -> Vec<ActionDefinition> {
        tags.iter()
            .filter_map(|tag| Self::variant(tag.as_ref()))
            .collect()
    }

    /// The definition behind a single tag.
    pub fn variant(tag: &str) -> Option<ActionDefinition> {
        tag.parse::<ActionKind>().ok().map(ActionDefinition::from)
    }

    /// The always-available bar.
    pub fn global_bar() -> &'static [ActionKind] {
        situations::GLOBAL_BAR
    }

    /// The curated, ordered list for a situation, before any filtering.
    pub fn situation_tags(situation: Situation) -> &'static [ActionKind] {
        situations::tags_for(situation)
    }

    /// What to offer right now.
    ///
    /// Situation-specific kinds that already sit on the global bar are
    /// removed, and every definition whose predicate fails is dropped.
    pub fn available(situation: Situation, ctx: &ActionContext<'_>) -> Available {
        let global = Self::global_bar();
        let visible = |kind: &&ActionKind| kind.is_visible(ctx);

        Available {
            global: global
                .iter()
                .filter(visible)
                .copied()
                .map(ActionDefinition::from)
                .collect(),
            situational: Self::situation_tags(situation)
                .iter()
                .filter(|kind| !global.contains(kind))
                .filter(visible)
                .copied()
                .map(ActionDefinition::from)
                .collect(),
        }
    }
}
