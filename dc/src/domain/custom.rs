//! User-supplied options for the editable category

use serde::Serialize;
use tracing::debug;

/// Ordered set of unique, trimmed, non-empty option strings
///
/// Insertion order is preserved. Uniqueness is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CustomOptionSet {
    items: Vec<String>,
}

impl CustomOptionSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an option, returning whether it was inserted
    ///
    /// The input is trimmed first; empty or already-present values are ignored.
    pub fn add(&mut self, item: &str) -> bool {
        let value = item.trim();
        debug!(%value, "add: called");
        if value.is_empty() {
            debug!("add: empty after trim, ignoring");
            return false;
        }
        if self.contains(value) {
            debug!(%value, "add: duplicate, ignoring");
            return false;
        }
        self.items.push(value.to_string());
        true
    }

    /// Remove an option, returning whether anything was removed
    pub fn remove(&mut self, item: &str) -> bool {
        debug!(%item, "remove: called");
        match self.items.iter().position(|existing| existing == item) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => {
                debug!(%item, "remove: not present");
                false
            }
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|existing| existing == item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
