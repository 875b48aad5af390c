//! SessionHandle - actor that owns a SessionController
//!
//! The controller lives on one task; handles are cheap to clone and talk to
//! it over a channel. Service calls run on the caller's task between the
//! begin and complete commands, so categories overlap freely.

use futures::future::join_all;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use super::controller::{DecisionOutcome, PendingRequest, SessionController};
use super::machine::RequestId;
use super::messages::{SessionCommand, SessionResponse};
use super::snapshot::SessionSnapshot;
use super::{ServiceError, SessionError};
use crate::domain::{CategoryId, CategoryRegistry, HistoryEntry, Mood};
use crate::service::DecisionService;

/// Handle to send commands to the session actor
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Spawn a new session actor owning the given controller
    pub fn spawn(controller: SessionController) -> Self {
        debug!("spawn: called");
        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(actor_loop(controller, rx));
        info!("Session actor spawned");
        Self { tx }
    }

    async fn call<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> SessionCommand) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| SessionError::ChannelClosed)?;
        reply_rx.await.map_err(|_| SessionError::ChannelClosed)
    }

    pub async fn select_category(&self, category: CategoryId) -> SessionResponse<()> {
        debug!(%category, "select_category: called");
        self.call(|reply| SessionCommand::SelectCategory { category, reply }).await
    }

    pub async fn begin_decision(&self, category: CategoryId) -> SessionResponse<PendingRequest> {
        debug!(%category, "begin_decision: called");
        self.call(|reply| SessionCommand::BeginDecision { category, reply })
            .await?
    }

    pub async fn complete_decision(
        &self,
        category: CategoryId,
        request_id: RequestId,
        raw: Result<String, ServiceError>,
    ) -> SessionResponse<DecisionOutcome> {
        debug!(%category, %request_id, "complete_decision: called");
        self.call(|reply| SessionCommand::CompleteDecision {
            category,
            request_id,
            raw,
            reply,
        })
        .await?
    }

    /// Request a decision for one category
    ///
    /// The actor is not held while the service runs.
    pub async fn request_decision(
        &self,
        category: CategoryId,
        service: &dyn DecisionService,
    ) -> SessionResponse<DecisionOutcome> {
        debug!(%category, service = %service.name(), "request_decision: called");
        let pending = self.begin_decision(category).await?;
        let raw = service.decide(&pending.request).await;
        self.complete_decision(category, pending.request_id, raw).await
    }

    /// Request decisions for every fixed category concurrently
    pub async fn decide_all_core(
        &self,
        service: &dyn DecisionService,
    ) -> Vec<(CategoryId, SessionResponse<DecisionOutcome>)> {
        debug!("decide_all_core: called");
        let categories: Vec<CategoryId> = CategoryRegistry::new().core_categories().map(|c| c.id).collect();
        let results = join_all(categories.iter().map(|id| self.request_decision(*id, service))).await;
        categories.into_iter().zip(results).collect()
    }

    pub async fn accept_current_decision(&self, category: CategoryId) -> SessionResponse<HistoryEntry> {
        debug!(%category, "accept_current_decision: called");
        self.call(|reply| SessionCommand::AcceptDecision { category, reply })
            .await?
    }

    pub async fn reset_category(&self, category: CategoryId) -> SessionResponse<()> {
        debug!(%category, "reset_category: called");
        self.call(|reply| SessionCommand::ResetCategory { category, reply })
            .await?
    }

    pub async fn add_custom_option(&self, item: &str) -> SessionResponse<bool> {
        debug!(%item, "add_custom_option: called");
        let item = item.to_string();
        self.call(|reply| SessionCommand::AddCustomOption { item, reply }).await
    }

    pub async fn remove_custom_option(&self, item: &str) -> SessionResponse<bool> {
        debug!(%item, "remove_custom_option: called");
        let item = item.to_string();
        self.call(|reply| SessionCommand::RemoveCustomOption { item, reply })
            .await
    }

    pub async fn toggle_mood(&self, mood: Mood) -> SessionResponse<Option<Mood>> {
        debug!(%mood, "toggle_mood: called");
        self.call(|reply| SessionCommand::ToggleMood { mood, reply }).await
    }

    pub async fn clear_mood(&self) -> SessionResponse<()> {
        debug!("clear_mood: called");
        self.call(|reply| SessionCommand::ClearMood { reply }).await
    }

    pub async fn snapshot(&self) -> SessionResponse<SessionSnapshot> {
        debug!("snapshot: called");
        self.call(|reply| SessionCommand::Snapshot { reply }).await
    }

    /// Stop the actor; later calls fail with `ChannelClosed`
    pub async fn shutdown(&self) -> SessionResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| SessionError::ChannelClosed)
    }
}

async fn actor_loop(mut controller: SessionController, mut rx: mpsc::Receiver<SessionCommand>) {
    debug!("actor_loop: called");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            SessionCommand::SelectCategory { category, reply } => {
                debug!(%category, "actor_loop: SelectCategory command");
                controller.select_category(category);
                let _ = reply.send(());
            }

            SessionCommand::BeginDecision { category, reply } => {
                debug!(%category, "actor_loop: BeginDecision command");
                let _ = reply.send(controller.begin_decision(category));
            }

            SessionCommand::CompleteDecision {
                category,
                request_id,
                raw,
                reply,
            } => {
                debug!(%category, %request_id, "actor_loop: CompleteDecision command");
                let _ = reply.send(controller.complete_decision(category, request_id, raw));
            }

            SessionCommand::AcceptDecision { category, reply } => {
                debug!(%category, "actor_loop: AcceptDecision command");
                let _ = reply.send(controller.accept_current_decision(category));
            }

            SessionCommand::ResetCategory { category, reply } => {
                debug!(%category, "actor_loop: ResetCategory command");
                let _ = reply.send(controller.reset_category(category));
            }

            SessionCommand::AddCustomOption { item, reply } => {
                debug!(%item, "actor_loop: AddCustomOption command");
                let _ = reply.send(controller.add_custom_option(&item));
            }

            SessionCommand::RemoveCustomOption { item, reply } => {
                debug!(%item, "actor_loop: RemoveCustomOption command");
                let _ = reply.send(controller.remove_custom_option(&item));
            }

            SessionCommand::ToggleMood { mood, reply } => {
                debug!(%mood, "actor_loop: ToggleMood command");
                let _ = reply.send(controller.toggle_mood(mood));
            }

            SessionCommand::ClearMood { reply } => {
                debug!("actor_loop: ClearMood command");
                controller.clear_mood();
                let _ = reply.send(());
            }

            SessionCommand::Snapshot { reply } => {
                debug!("actor_loop: Snapshot command");
                let _ = reply.send(controller.snapshot());
            }

            SessionCommand::Shutdown => {
                info!("Session actor shutting down");
                break;
            }
        }
    }

    debug!("actor_loop: exited");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handle_round_trip_commands() {
        let handle = SessionHandle::spawn(SessionController::new());

        assert!(handle.add_custom_option("Gym").await.unwrap());
        assert_eq!(handle.toggle_mood(Mood::Good).await.unwrap(), Some(Mood::Good));

        let pending = handle.begin_decision(CategoryId::Custom).await.unwrap();
        let outcome = handle
            .complete_decision(
                CategoryId::Custom,
                pending.request_id,
                Ok(r#"{"choice": "Gym"}"#.to_string()),
            )
            .await
            .unwrap();
        assert!(matches!(outcome, DecisionOutcome::Decided(ref d) if d.choice == "Gym"));

        let entry = handle.accept_current_decision(CategoryId::Custom).await.unwrap();
        assert_eq!(entry.choice(), "Gym");

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.history.len(), 1);
        assert_eq!(snapshot.mood, Some(Mood::Good));

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_channel_maps_to_error() {
        let handle = SessionHandle::spawn(SessionController::new());
        handle.shutdown().await.unwrap();

        // Commands queued behind Shutdown are dropped with their reply senders
        assert!(matches!(handle.snapshot().await, Err(SessionError::ChannelClosed)));
        assert!(matches!(
            handle.toggle_mood(Mood::Tired).await,
            Err(SessionError::ChannelClosed)
        ));
    }

    #[tokio::test]
    async fn test_begin_then_reset_is_rejected_while_pending() {
        let handle = SessionHandle::spawn(SessionController::new());
        handle.begin_decision(CategoryId::Work).await.unwrap();

        let err = handle.reset_category(CategoryId::Work).await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.category(CategoryId::Work).unwrap().state, "pending");
    }
}
