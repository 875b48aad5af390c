//! Mood modifier shared across all categories

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The user's current mood/energy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Tired,
    Good,
    Energized,
    Stressed,
    Overwhelmed,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Tired,
        Mood::Good,
        Mood::Energized,
        Mood::Stressed,
        Mood::Overwhelmed,
    ];

    /// Display label including the emoji, as sent to the decision service
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tired => "😴 Tired",
            Self::Good => "😊 Good",
            Self::Energized => "🔥 Energized",
            Self::Stressed => "😤 Stressed",
            Self::Overwhelmed => "🌀 Overwhelmed",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tired" => Ok(Self::Tired),
            "good" => Ok(Self::Good),
            "energized" => Ok(Self::Energized),
            "stressed" => Ok(Self::Stressed),
            "overwhelmed" => Ok(Self::Overwhelmed),
            _ => Err(format!(
                "Unknown mood: {}. Use: tired, good, energized, stressed, or overwhelmed",
                s
            )),
        }
    }
}

/// Holds at most one active mood
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoodContext {
    active: Option<Mood>,
}

impl MoodContext {
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Select a mood; selecting the active mood again clears it
    pub fn select(&mut self, mood: Mood) -> Option<Mood> {
        debug!(%mood, current = ?self.active, "select: called");
        self.active = if self.active == Some(mood) { None } else { Some(mood) };
        self.active
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<Mood> {
        self.active
    }
}
