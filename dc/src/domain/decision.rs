//! Validated decision returned by the decision service

use serde::{Deserialize, Serialize};

/// A single validated (choice, reasoning) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// The chosen option; never empty
    pub choice: String,

    /// Short justification, if the service gave one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl Decision {
    pub fn new(choice: impl Into<String>, reasoning: Option<String>) -> Self {
        Self {
            choice: choice.into(),
            reasoning,
        }
    }
}
