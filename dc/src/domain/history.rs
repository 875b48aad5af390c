//! Append-only ledger of committed decisions

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::category::CategoryId;

/// Identifier of a history entry; increases with creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entry-{}", self.0)
    }
}

/// A committed decision. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    id: EntryId,
    category: CategoryId,
    label: String,
    icon: String,
    choice: String,
    committed_at: DateTime<Local>,
}

impl HistoryEntry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn category(&self) -> CategoryId {
        self.category
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn choice(&self) -> &str {
        &self.choice
    }

    pub fn committed_at(&self) -> DateTime<Local> {
        self.committed_at
    }

    /// Commit time as `HH:MM`
    pub fn time_label(&self) -> String {
        self.committed_at.format("%H:%M").to_string()
    }

    /// Commit date as e.g. `Fri, Oct 16`
    pub fn date_label(&self) -> String {
        self.committed_at.format("%a, %b %-d").to_string()
    }
}

/// Most-recent-first record of committed decisions
///
/// Entries are never updated or removed.
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    entries: VecDeque<HistoryEntry>,
    next_id: u64,
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Record a committed decision at the current local time
    pub fn commit(&mut self, category: CategoryId, label: &str, icon: &str, choice: &str) -> HistoryEntry {
        self.commit_at(category, label, icon, choice, Local::now())
    }

    /// Record a committed decision at an explicit time
    pub fn commit_at(
        &mut self,
        category: CategoryId,
        label: &str,
        icon: &str,
        choice: &str,
        at: DateTime<Local>,
    ) -> HistoryEntry {
        debug!(%category, %choice, "commit_at: called");
        let id = EntryId(self.next_id);
        self.next_id = id.0 + 1;

        let entry = HistoryEntry {
            id,
            category,
            label: label.to_string(),
            icon: icon.to_string(),
            choice: choice.to_string(),
            committed_at: at,
        };
        self.entries.push_front(entry.clone());
        info!(%id, %category, %choice, "Decision committed to ledger");
        entry
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
