//! Per-category decision lifecycle
//!
//! ```text
//! Idle ──request──▶ Pending ──success──▶ Decided ──commit──▶ Committed
//!  ▲                  │                    │                    │
//!  └─────failure──────┘◀──────request──────┘                    │
//!  └───────────────────────────reset────────────────────────────┘
//! ```
//!
//! Results carry the `RequestId` minted when the request began. A result
//! whose id does not match the current `Pending` id is stale and discarded.

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::SessionError;
use crate::domain::{Category, CategoryId, Decision, EntryId, HistoryEntry, HistoryLedger};

/// Correlation token for one in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of one category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryState {
    #[default]
    Idle,
    Pending {
        request_id: RequestId,
    },
    Decided {
        decision: Decision,
    },
    Committed {
        decision: Decision,
        entry_id: EntryId,
    },
}

impl CategoryState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending { .. } => "pending",
            Self::Decided { .. } => "decided",
            Self::Committed { .. } => "committed",
        }
    }

    /// The held decision, if any
    pub fn decision(&self) -> Option<&Decision> {
        match self {
            Self::Decided { decision } | Self::Committed { decision, .. } => Some(decision),
            Self::Idle | Self::Pending { .. } => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

impl std::fmt::Display for CategoryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Whether a result was applied or discarded as stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Stale,
}

/// State machine for a single category
#[derive(Debug, Clone)]
pub struct DecisionStateMachine {
    category: CategoryId,
    state: CategoryState,
}

impl DecisionStateMachine {
    pub fn new(category: CategoryId) -> Self {
        Self {
            category,
            state: CategoryState::Idle,
        }
    }

    pub fn category(&self) -> CategoryId {
        self.category
    }

    pub fn state(&self) -> &CategoryState {
        &self.state
    }

    pub fn decision(&self) -> Option<&Decision> {
        self.state.decision()
    }

    /// Check that a request may start, without changing state
    pub fn ensure_can_request(&self) -> Result<(), SessionError> {
        match self.state {
            CategoryState::Idle | CategoryState::Decided { .. } => Ok(()),
            CategoryState::Pending { .. } => Err(SessionError::RequestInFlight {
                category: self.category,
            }),
            CategoryState::Committed { .. } => Err(self.invalid("request a decision for")),
        }
    }

    /// Enter `Pending`, discarding any previous decision
    ///
    /// The caller has already checked the pool is non-empty.
    pub fn begin(&mut self) -> Result<RequestId, SessionError> {
        debug!(category = %self.category, state = %self.state, "begin: called");
        self.ensure_can_request()?;
        let request_id = RequestId::new();
        self.state = CategoryState::Pending { request_id };
        debug!(category = %self.category, %request_id, "begin: pending");
        Ok(request_id)
    }

    fn is_current(&self, request_id: RequestId) -> bool {
        matches!(self.state, CategoryState::Pending { request_id: current } if current == request_id)
    }

    /// Apply a validated decision for the given request
    pub fn on_success(&mut self, request_id: RequestId, decision: Decision) -> ApplyOutcome {
        debug!(category = %self.category, %request_id, "on_success: called");
        if !self.is_current(request_id) {
            warn!(category = %self.category, %request_id, state = %self.state, "Discarding stale decision");
            return ApplyOutcome::Stale;
        }
        info!(category = %self.category, choice = %decision.choice, "Decision received");
        self.state = CategoryState::Decided { decision };
        ApplyOutcome::Applied
    }

    /// Return to `Idle` after a failed request
    pub fn on_failure(&mut self, request_id: RequestId) -> ApplyOutcome {
        debug!(category = %self.category, %request_id, "on_failure: called");
        if !self.is_current(request_id) {
            warn!(category = %self.category, %request_id, state = %self.state, "Discarding stale failure");
            return ApplyOutcome::Stale;
        }
        self.state = CategoryState::Idle;
        ApplyOutcome::Applied
    }

    /// Freeze the current decision and record it in the ledger
    pub fn commit(&mut self, category: &Category, ledger: &mut HistoryLedger) -> Result<HistoryEntry, SessionError> {
        debug!(category = %self.category, state = %self.state, "commit: called");
        let decision = match &self.state {
            CategoryState::Decided { decision } => decision.clone(),
            _ => return Err(self.invalid("commit")),
        };

        let entry = ledger.commit(self.category, category.label, category.icon, &decision.choice);
        self.state = CategoryState::Committed {
            decision,
            entry_id: entry.id(),
        };
        Ok(entry)
    }

    /// Leave `Committed` so the category can be decided again
    ///
    /// A no-op when already `Idle`. The ledger entry stays.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        debug!(category = %self.category, state = %self.state, "reset: called");
        match self.state {
            CategoryState::Idle => Ok(()),
            CategoryState::Committed { .. } => {
                self.state = CategoryState::Idle;
                Ok(())
            }
            CategoryState::Pending { .. } | CategoryState::Decided { .. } => Err(self.invalid("reset")),
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            category: self.category,
            state: self.state.name(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryRegistry;

    fn tacos() -> Decision {
        Decision::new("Tacos", Some("Quick.".to_string()))
    }

    fn decided() -> DecisionStateMachine {
        let mut machine = DecisionStateMachine::new(CategoryId::Meals);
        let id = machine.begin().unwrap();
        assert_eq!(machine.on_success(id, tacos()), ApplyOutcome::Applied);
        machine
    }

    #[test]
    fn test_idle_to_pending_to_decided() {
        let mut machine = DecisionStateMachine::new(CategoryId::Meals);
        assert_eq!(machine.state(), &CategoryState::Idle);

        let id = machine.begin().unwrap();
        assert!(machine.state().is_pending());
        assert!(machine.decision().is_none());

        machine.on_success(id, tacos());
        assert_eq!(machine.decision(), Some(&tacos()));
        assert_eq!(machine.state().name(), "decided");
    }

    #[test]
    fn test_failure_returns_to_idle() {
        let mut machine = DecisionStateMachine::new(CategoryId::Meals);
        let id = machine.begin().unwrap();
        assert_eq!(machine.on_failure(id), ApplyOutcome::Applied);
        assert_eq!(machine.state(), &CategoryState::Idle);
    }

    #[test]
    fn test_second_request_while_pending_rejected() {
        let mut machine = DecisionStateMachine::new(CategoryId::Work);
        let id = machine.begin().unwrap();

        let err = machine.begin().unwrap_err();
        assert_eq!(
            err,
            SessionError::RequestInFlight {
                category: CategoryId::Work
            }
        );
        assert_eq!(machine.state(), &CategoryState::Pending { request_id: id });
    }

    #[test]
    fn test_regenerate_discards_previous_decision() {
        let mut machine = decided();

        machine.begin().unwrap();
        assert!(machine.decision().is_none());
    }

    #[test]
    fn test_stale_success_is_discarded() {
        let mut machine = DecisionStateMachine::new(CategoryId::Meals);
        let old = machine.begin().unwrap();
        machine.on_failure(old);

        let current = machine.begin().unwrap();
        assert_eq!(machine.on_success(old, Decision::new("Pizza", None)), ApplyOutcome::Stale);
        assert_eq!(machine.state(), &CategoryState::Pending { request_id: current });

        machine.on_success(current, tacos());
        // A late response never overwrites a newer decision
        assert_eq!(machine.on_success(old, Decision::new("Pizza", None)), ApplyOutcome::Stale);
        assert_eq!(machine.on_failure(old), ApplyOutcome::Stale);
        assert_eq!(machine.decision(), Some(&tacos()));
    }

    #[test]
    fn test_commit_and_reset() {
        let registry = CategoryRegistry::new();
        let mut ledger = HistoryLedger::new();
        let mut machine = decided();

        let entry = machine.commit(registry.get(CategoryId::Meals), &mut ledger).unwrap();
        assert_eq!(entry.choice(), "Tacos");
        assert_eq!(entry.label(), "Eat");
        assert!(machine.state().is_committed());
        assert_eq!(machine.decision(), Some(&tacos()));
        assert_eq!(ledger.len(), 1);

        machine.reset().unwrap();
        assert_eq!(machine.state(), &CategoryState::Idle);
        assert!(machine.decision().is_none());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_commit_outside_decided_rejected() {
        let registry = CategoryRegistry::new();
        let mut ledger = HistoryLedger::new();
        let mut machine = DecisionStateMachine::new(CategoryId::Meals);

        assert!(matches!(
            machine.commit(registry.get(CategoryId::Meals), &mut ledger),
            Err(SessionError::InvalidTransition { action: "commit", .. })
        ));
        machine.begin().unwrap();
        assert!(machine.commit(registry.get(CategoryId::Meals), &mut ledger).is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_committed_rejects_request_and_second_commit() {
        let registry = CategoryRegistry::new();
        let mut ledger = HistoryLedger::new();
        let mut machine = decided();
        machine.commit(registry.get(CategoryId::Meals), &mut ledger).unwrap();

        assert!(matches!(machine.begin(), Err(SessionError::InvalidTransition { .. })));
        assert!(machine.commit(registry.get(CategoryId::Meals), &mut ledger).is_err());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_reset_rules() {
        let mut machine = DecisionStateMachine::new(CategoryId::Meals);
        assert!(machine.reset().is_ok());

        machine.begin().unwrap();
        assert!(matches!(
            machine.reset(),
            Err(SessionError::InvalidTransition { state: "pending", .. })
        ));

        let mut machine = decided();
        assert!(matches!(
            machine.reset(),
            Err(SessionError::InvalidTransition { state: "decided", .. })
        ));
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }
}
