//! Security changes between two consecutive selections.

use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SecurityChanges {
    pub fn between(previous: &BTreeSet<String>, current: &BTreeSet<String>) -> Self {
        Self {
            added: current.difference(previous).cloned().collect(),
            removed: previous.difference(current).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

fn join_or_none(symbols: &[String]) -> String {
    if symbols.is_empty() {
        "none".to_string()
    } else {
        symbols.join(",")
    }
}

impl fmt::Display for SecurityChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SecurityChanges: Added: {} Removed: {}",
            join_or_none(&self.added),
            join_or_none(&self.removed)
        )
    }
}
