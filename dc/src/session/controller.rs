//! SessionController - single owner of all session state
//!
//! Every mutation goes through a command method here. The controller is
//! synchronous; `SessionHandle` wraps it for concurrent callers.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::machine::{ApplyOutcome, CategoryState, DecisionStateMachine, RequestId};
use super::request::{DecisionRequest, DecisionRequestBuilder};
use super::snapshot::SessionSnapshot;
use super::validator::ResponseValidator;
use super::{ServiceError, SessionError};
use crate::domain::{
    CategoryId, CategoryRegistry, CustomOptionSet, Decision, HistoryEntry, HistoryLedger, Mood, MoodContext,
};
use crate::service::DecisionService;

static IDLE: CategoryState = CategoryState::Idle;

/// A request that has been accepted and is waiting on the decision service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub request_id: RequestId,
    pub request: DecisionRequest,
}

impl PendingRequest {
    pub fn category(&self) -> CategoryId {
        self.request.category()
    }
}

/// Result of applying a service response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    Decided(Decision),
    /// The category moved on before the response arrived
    Stale,
}

/// The most recent user-visible failure, scoped to one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryError {
    pub category: CategoryId,
    pub message: String,
}

/// Orchestrates one decision session
#[derive(Debug, Clone)]
pub struct SessionController {
    registry: CategoryRegistry,
    builder: DecisionRequestBuilder,
    validator: ResponseValidator,
    machines: HashMap<CategoryId, DecisionStateMachine>,
    mood: MoodContext,
    custom: CustomOptionSet,
    ledger: HistoryLedger,
    active: CategoryId,
    last_error: Option<CategoryError>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    pub fn new() -> Self {
        debug!("SessionController::new: called");
        let registry = CategoryRegistry::new();
        let machines = registry
            .list_categories()
            .iter()
            .map(|c| (c.id, DecisionStateMachine::new(c.id)))
            .collect();

        Self {
            registry,
            builder: DecisionRequestBuilder::new(),
            validator: ResponseValidator::new(),
            machines,
            mood: MoodContext::new(),
            custom: CustomOptionSet::new(),
            ledger: HistoryLedger::new(),
            active: CategoryId::Meals,
            last_error: None,
        }
    }

    fn machine_mut(&mut self, category: CategoryId) -> &mut DecisionStateMachine {
        self.machines
            .entry(category)
            .or_insert_with(|| DecisionStateMachine::new(category))
    }

    fn record_error(&mut self, category: CategoryId, err: &SessionError) {
        if let Some(message) = err.user_message() {
            self.last_error = Some(CategoryError {
                category,
                message: message.to_string(),
            });
        }
    }

    // === Commands ===

    /// Make a category the active one; clears the displayed error
    pub fn select_category(&mut self, category: CategoryId) {
        debug!(%category, "select_category: called");
        self.active = category;
        self.last_error = None;
    }

    /// Start a request: validate state and pool, then enter `Pending`
    ///
    /// Category state is unchanged on error. Only an empty pool replaces the
    /// last error; rejected transitions leave it alone.
    pub fn begin_decision(&mut self, category: CategoryId) -> Result<PendingRequest, SessionError> {
        debug!(%category, "begin_decision: called");
        self.machine_mut(category).ensure_can_request()?;

        let pool = self.registry.pool_for(category, &self.custom);
        let request = match self
            .builder
            .build(self.registry.get(category), pool, self.mood.active())
        {
            Ok(request) => request,
            Err(e) => {
                self.record_error(category, &e);
                return Err(e);
            }
        };

        self.last_error = None;
        let request_id = self.machine_mut(category).begin()?;
        info!(%category, %request_id, "Decision requested");
        Ok(PendingRequest { request_id, request })
    }

    /// Apply the service's raw result for a previously begun request
    ///
    /// Stale results are discarded without touching state or the last error.
    pub fn complete_decision(
        &mut self,
        category: CategoryId,
        request_id: RequestId,
        raw: Result<String, ServiceError>,
    ) -> Result<DecisionOutcome, SessionError> {
        debug!(%category, %request_id, ok = raw.is_ok(), "complete_decision: called");
        let validated = raw.and_then(|text| self.validator.validate(&text));

        match validated {
            Ok(decision) => match self.machine_mut(category).on_success(request_id, decision.clone()) {
                ApplyOutcome::Applied => Ok(DecisionOutcome::Decided(decision)),
                ApplyOutcome::Stale => Ok(DecisionOutcome::Stale),
            },
            Err(service_err) => match self.machine_mut(category).on_failure(request_id) {
                ApplyOutcome::Applied => {
                    warn!(%category, error = %service_err, "Decision request failed");
                    let err = SessionError::Service(service_err);
                    self.record_error(category, &err);
                    Err(err)
                }
                ApplyOutcome::Stale => Ok(DecisionOutcome::Stale),
            },
        }
    }

    /// Begin, call the service, and complete in one step
    pub async fn request_decision(
        &mut self,
        category: CategoryId,
        service: &dyn DecisionService,
    ) -> Result<DecisionOutcome, SessionError> {
        debug!(%category, service = %service.name(), "request_decision: called");
        let pending = self.begin_decision(category)?;
        let raw = service.decide(&pending.request).await;
        self.complete_decision(category, pending.request_id, raw)
    }

    /// Commit the category's current decision to the ledger
    pub fn accept_current_decision(&mut self, category: CategoryId) -> Result<HistoryEntry, SessionError> {
        debug!(%category, "accept_current_decision: called");
        let definition = self.registry.get(category);
        let machine = self
            .machines
            .entry(category)
            .or_insert_with(|| DecisionStateMachine::new(category));
        machine.commit(definition, &mut self.ledger)
    }

    /// Return a committed category to `Idle`; the ledger is untouched
    pub fn reset_category(&mut self, category: CategoryId) -> Result<(), SessionError> {
        debug!(%category, "reset_category: called");
        self.machine_mut(category).reset()
    }

    pub fn add_custom_option(&mut self, item: &str) -> bool {
        debug!(%item, "add_custom_option: called");
        self.custom.add(item)
    }

    pub fn remove_custom_option(&mut self, item: &str) -> bool {
        debug!(%item, "remove_custom_option: called");
        self.custom.remove(item)
    }

    /// Select a mood, or clear it if it is already active
    pub fn toggle_mood(&mut self, mood: Mood) -> Option<Mood> {
        debug!(%mood, "toggle_mood: called");
        self.mood.select(mood)
    }

    pub fn clear_mood(&mut self) {
        debug!("clear_mood: called");
        self.mood.clear();
    }

    // === Queries ===

    /// True iff every fixed category is `Committed`
    pub fn all_core_categories_committed(&self) -> bool {
        self.registry
            .core_categories()
            .all(|c| self.state(c.id).is_committed())
    }

    pub fn state(&self, category: CategoryId) -> &CategoryState {
        self.machines.get(&category).map(|m| m.state()).unwrap_or(&IDLE)
    }

    pub fn decision(&self, category: CategoryId) -> Option<&Decision> {
        self.state(category).decision()
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn custom_options(&self) -> &CustomOptionSet {
        &self.custom
    }

    pub fn mood(&self) -> Option<Mood> {
        self.mood.active()
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn active_category(&self) -> CategoryId {
        self.active
    }

    pub fn last_error(&self) -> Option<&CategoryError> {
        self.last_error.as_ref()
    }

    /// Serializable view of everything a renderer needs
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_controller(self)
    }
}
