//! Decision session state machine
//!
//! One `DecisionStateMachine` per category, composed by `SessionController`,
//! with `SessionHandle` as the concurrent actor front.

mod controller;
mod error;
mod handle;
mod machine;
mod messages;
mod request;
mod snapshot;
mod validator;

pub use controller::{CategoryError, DecisionOutcome, PendingRequest, SessionController};
pub use error::{ServiceError, SessionError};
pub use handle::SessionHandle;
pub use machine::{ApplyOutcome, CategoryState, DecisionStateMachine, RequestId};
pub use messages::{SessionCommand, SessionResponse};
pub use request::{DecisionRequest, DecisionRequestBuilder};
pub use snapshot::{CategorySnapshot, HistoryView, SessionSnapshot};
pub use validator::ResponseValidator;

use crate::domain::CategoryId;

/// Parse a category id or label from user input
pub fn parse_category(input: &str) -> Result<CategoryId, SessionError> {
    input
        .parse::<CategoryId>()
        .map_err(|_| SessionError::UnknownCategory(input.trim().to_string()))
}
