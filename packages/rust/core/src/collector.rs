//! Locating timeline entries inside a raw response.
//!
//! Different endpoints wrap the same instruction list in different
//! containers. Containers are tried in priority order and the first one
//! that resolves to an instruction array wins, even an empty one.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::accessor::{self, Path, json_path};

/// Which upstream container the entries came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineKind {
    Bookmarks,
    Home,
    Generic,
}

impl fmt::Display for TimelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bookmarks => "bookmark timeline",
            Self::Home => "home timeline",
            Self::Generic => "timeline",
        };
        f.write_str(name)
    }
}

/// Instruction containers in priority order.
pub const CONTAINERS: &[(TimelineKind, Path)] = &[
    (
        TimelineKind::Bookmarks,
        json_path!("data", "bookmark_timeline_v2", "timeline", "instructions"),
    ),
    (
        TimelineKind::Home,
        json_path!("data", "home", "home_timeline_urt", "instructions"),
    ),
    (
        TimelineKind::Generic,
        json_path!("data", "user", "result", "timeline", "timeline", "instructions"),
    ),
];

/// Keys under which one instruction may expose entries.
const ENTRY_LISTS: &[Path] = &[json_path!("entries"), json_path!("addEntries", "entries")];

/// Entries found in a document, borrowed from it.
#[derive(Debug, Default)]
pub struct CollectedEntries<'a> {
    /// Matched container, `None` if the shape was not recognized.
    pub kind: Option<TimelineKind>,
    pub entries: Vec<&'a Value>,
}

/// Find the instruction list of a document and flatten its entries.
pub fn collect_entries(document: &Value) -> CollectedEntries<'_> {
    let Some((kind, instructions)) = find_instructions(document) else {
        debug!("no known timeline container in document");
        return CollectedEntries::default();
    };

    let entries: Vec<&Value> = instructions
        .iter()
        .flat_map(|instruction| {
            ENTRY_LISTS
                .iter()
                .flat_map(move |list| accessor::array_or_empty(instruction, list))
        })
        .collect();

    debug!(
        %kind,
        instructions = instructions.len(),
        entries = entries.len(),
        "collected timeline entries"
    );

    CollectedEntries {
        kind: Some(kind),
        entries,
    }
}

fn find_instructions(document: &Value) -> Option<(TimelineKind, &[Value])> {
    CONTAINERS.iter().find_map(|(kind, container)| {
        accessor::array_at(document, container).map(|instructions| (*kind, instructions))
    })
}
