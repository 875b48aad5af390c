//! Session and decision service errors

use thiserror::Error;

use crate::domain::CategoryId;

/// Failures of the external decision service, after normalization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Transport, HTTP, or provider failure
    #[error("decision service unavailable: {0}")]
    Unavailable(String),

    /// The response text did not hold a well-formed decision
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The request prompt could not be rendered
    #[error("failed to render decision prompt: {0}")]
    Prompt(String),
}

impl ServiceError {
    /// Message shown to the user when this failure ends a request
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "The decision service returned a malformed response. Try again.",
            Self::Unavailable(_) | Self::Prompt(_) => "Couldn't reach the decision service. Try again.",
        }
    }
}

/// Errors from session commands
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no options to choose from for {category}")]
    EmptyPool { category: CategoryId },

    #[error("a decision for {category} is already in flight")]
    RequestInFlight { category: CategoryId },

    #[error("cannot {action} {category} while {state}")]
    InvalidTransition {
        category: CategoryId,
        state: &'static str,
        action: &'static str,
    },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("session channel closed")]
    ChannelClosed,
}

impl SessionError {
    /// User-visible message for errors that are recorded as the session's last error
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::EmptyPool { .. } => Some("Add at least one option to your custom list first."),
            Self::Service(e) => Some(e.user_message()),
            _ => None,
        }
    }
}
