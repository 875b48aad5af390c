//! Serializable read model of a session

use serde::Serialize;

use super::controller::{CategoryError, SessionController};
use crate::domain::{CategoryId, Decision, EntryId, HistoryEntry, Mood};

/// Everything a renderer needs, detached from the controller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub active_category: CategoryId,
    pub categories: Vec<CategorySnapshot>,
    pub custom_options: Vec<String>,
    pub mood: Option<Mood>,
    pub history: Vec<HistoryView>,
    pub error: Option<CategoryError>,
    pub all_core_committed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySnapshot {
    pub id: CategoryId,
    pub label: String,
    pub icon: String,
    pub state: String,
    pub decision: Option<Decision>,
    pub committed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryView {
    pub id: EntryId,
    pub category: CategoryId,
    pub label: String,
    pub icon: String,
    pub choice: String,
    pub time: String,
    pub date: String,
}

impl From<&HistoryEntry> for HistoryView {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id(),
            category: entry.category(),
            label: entry.label().to_string(),
            icon: entry.icon().to_string(),
            choice: entry.choice().to_string(),
            time: entry.time_label(),
            date: entry.date_label(),
        }
    }
}

impl SessionSnapshot {
    pub fn from_controller(controller: &SessionController) -> Self {
        let categories = controller
            .registry()
            .list_categories()
            .iter()
            .map(|c| {
                let state = controller.state(c.id);
                CategorySnapshot {
                    id: c.id,
                    label: c.label.to_string(),
                    icon: c.icon.to_string(),
                    state: state.name().to_string(),
                    decision: state.decision().cloned(),
                    committed: state.is_committed(),
                }
            })
            .collect();

        Self {
            active_category: controller.active_category(),
            categories,
            custom_options: controller.custom_options().as_slice().to_vec(),
            mood: controller.mood(),
            history: controller.history().entries().map(HistoryView::from).collect(),
            error: controller.last_error().cloned(),
            all_core_committed: controller.all_core_categories_committed(),
        }
    }

    pub fn category(&self, id: CategoryId) -> Option<&CategorySnapshot> {
        self.categories.iter().find(|c| c.id == id)
    }
}
