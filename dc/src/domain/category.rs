//! Category catalog
//!
//! Four fixed categories with immutable suggestion pools, plus the one
//! user-editable category whose pool is the session's custom option list.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::custom::CustomOptionSet;

/// Identifier of a decision category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    Meals,
    Outfits,
    Activities,
    Work,
    Custom,
}

impl CategoryId {
    /// All category ids in display order
    pub const ALL: [CategoryId; 5] = [
        CategoryId::Meals,
        CategoryId::Outfits,
        CategoryId::Activities,
        CategoryId::Work,
        CategoryId::Custom,
    ];

    /// The id string used in logs, CLI arguments and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meals => "meals",
            Self::Outfits => "outfits",
            Self::Activities => "activities",
            Self::Work => "work",
            Self::Custom => "custom",
        }
    }

    /// Whether this category draws its pool from the custom option set
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Custom)
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CategoryId {
    type Err = String;

    /// Accepts ids (`meals`) and labels (`eat`), case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "meals" | "eat" => Ok(Self::Meals),
            "outfits" | "wear" => Ok(Self::Outfits),
            "activities" | "do" => Ok(Self::Activities),
            "work" | "focus" => Ok(Self::Work),
            "custom" => Ok(Self::Custom),
            _ => Err(format!(
                "Unknown category: {}. Use: meals, outfits, activities, work, or custom",
                s
            )),
        }
    }
}

/// A category definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub label: &'static str,
    pub icon: &'static str,
    /// Built-in pool; empty for the editable category
    pub suggestions: &'static [&'static str],
}

const CATALOG: [Category; 5] = [
    Category {
        id: CategoryId::Meals,
        label: "Eat",
        icon: "🍽️",
        suggestions: &[
            "Pasta carbonara",
            "Grilled salmon",
            "Caesar salad",
            "Tacos",
            "Stir fry",
            "Pizza",
            "Ramen",
            "Sushi",
            "Burgers",
            "Soup & bread",
        ],
    },
    Category {
        id: CategoryId::Outfits,
        label: "Wear",
        icon: "👔",
        suggestions: &[
            "Casual jeans + tee",
            "Smart casual blazer",
            "Athleisure",
            "Business formal",
            "Summer dress",
            "Cozy sweater + trousers",
            "Monochrome look",
            "Smart sneakers + chinos",
        ],
    },
    Category {
        id: CategoryId::Activities,
        label: "Do",
        icon: "⚡",
        suggestions: &[
            "30-min walk",
            "Read a chapter",
            "Call a friend",
            "Watch a documentary",
            "Cook something new",
            "Journal",
            "Stretch / yoga",
            "Visit a local spot",
        ],
    },
    Category {
        id: CategoryId::Work,
        label: "Focus",
        icon: "🎯",
        suggestions: &[
            "Deep work block",
            "Clear inbox to zero",
            "One key project task",
            "Team check-ins",
            "Plan tomorrow",
            "Review goals",
            "Learn something new",
            "Brainstorm session",
        ],
    },
    Category {
        id: CategoryId::Custom,
        label: "Custom",
        icon: "✦",
        suggestions: &[],
    },
];

/// Read-only catalog of categories
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryRegistry;

impl CategoryRegistry {
    pub fn new() -> Self {
        Self
    }

    /// All categories in display order
    pub fn list_categories(&self) -> &'static [Category] {
        &CATALOG
    }

    /// Look up a category definition
    pub fn get(&self, id: CategoryId) -> &'static Category {
        // CATALOG is declared in CategoryId::ALL order
        &CATALOG[id as usize]
    }

    /// The fixed (non-editable) categories
    pub fn core_categories(&self) -> impl Iterator<Item = &'static Category> {
        CATALOG.iter().filter(|c| !c.id.is_editable())
    }

    /// Effective pool for a category
    ///
    /// Fixed categories return their built-in suggestions; the editable one
    /// returns the current custom options.
    pub fn pool_for(&self, id: CategoryId, custom: &CustomOptionSet) -> Vec<String> {
        debug!(category = %id, "pool_for: called");
        if id.is_editable() {
            custom.iter().map(str::to_string).collect()
        } else {
            self.get(id).suggestions.iter().map(|s| s.to_string()).collect()
        }
    }
}
