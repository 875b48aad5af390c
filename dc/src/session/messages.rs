//! Session actor messages
//!
//! Commands and responses for the actor pattern.

use tokio::sync::oneshot;

use super::controller::{DecisionOutcome, PendingRequest};
use super::machine::RequestId;
use super::snapshot::SessionSnapshot;
use super::{ServiceError, SessionError};
use crate::domain::{CategoryId, HistoryEntry, Mood};

/// Response from session operations
pub type SessionResponse<T> = Result<T, SessionError>;

/// Commands sent to the session actor
#[derive(Debug)]
pub enum SessionCommand {
    SelectCategory {
        category: CategoryId,
        reply: oneshot::Sender<()>,
    },
    BeginDecision {
        category: CategoryId,
        reply: oneshot::Sender<SessionResponse<PendingRequest>>,
    },
    CompleteDecision {
        category: CategoryId,
        request_id: RequestId,
        raw: Result<String, ServiceError>,
        reply: oneshot::Sender<SessionResponse<DecisionOutcome>>,
    },
    AcceptDecision {
        category: CategoryId,
        reply: oneshot::Sender<SessionResponse<HistoryEntry>>,
    },
    ResetCategory {
        category: CategoryId,
        reply: oneshot::Sender<SessionResponse<()>>,
    },
    AddCustomOption {
        item: String,
        reply: oneshot::Sender<bool>,
    },
    RemoveCustomOption {
        item: String,
        reply: oneshot::Sender<bool>,
    },
    ToggleMood {
        mood: Mood,
        reply: oneshot::Sender<Option<Mood>>,
    },
    ClearMood {
        reply: oneshot::Sender<()>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Shutdown,
}
