//! Domain types for decision sessions
//!
//! Pure data and small collections with no I/O: the category catalog, the
//! custom option list, the mood modifier, decisions, and the commit ledger.

mod category;
mod custom;
mod decision;
mod history;
mod mood;

pub use category::{Category, CategoryId, CategoryRegistry};
pub use custom::CustomOptionSet;
pub use decision::Decision;
pub use history::{EntryId, HistoryEntry, HistoryLedger};
pub use mood::{Mood, MoodContext};
