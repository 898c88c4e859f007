//! Call Desk - Operator-facing session service
//!
//! Owns one workflow session and the shared record log. Every completion
//! the session produces is appended to the log exactly once.

use std::sync::Arc;

use super::RecordLog;
use crate::domain::{
    compute_daily_stats, top_selling_items, CallOutcome, CallRecord, CallWorkflow, DailyStats,
    DomainError, ItemSales, MenuItem, Transition, WorkflowInput,
};
use crate::ports::{Clock, KeyValueStore};

pub struct CallDesk<S: KeyValueStore> {
    workflow: CallWorkflow,
    log: Arc<RecordLog<S>>,
    /// Completed record whose append failed, awaiting retry or discard
    pending: Option<CallRecord>,
}

impl<S: KeyValueStore> CallDesk<S> {
    pub fn new(log: Arc<RecordLog<S>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            workflow: CallWorkflow::new(clock),
            log,
            pending: None,
        }
    }

    pub fn workflow(&self) -> &CallWorkflow {
        &self.workflow
    }

    pub fn log(&self) -> &Arc<RecordLog<S>> {
        &self.log
    }

    /// Feed one input to the session
    ///
    /// On a completion the record is appended before returning. If that
    /// fails the session has still been reset and the record is kept as
    /// pending, see [`CallDesk::retry_pending`].
    pub async fn handle(&mut self, input: WorkflowInput) -> Result<Transition, DomainError> {
        let transition = self.workflow.apply(input);

        if let Transition::Completed(record) = &transition {
            if let Err(e) = self.log.append(record.clone()).await {
                if let Some(dropped) = self.pending.replace(record.clone()) {
                    tracing::warn!(
                        "⚠️  Unsaved record for room {} replaced by a newer one",
                        dropped.room_number()
                    );
                }
                return Err(e);
            }
        }

        Ok(transition)
    }

    pub async fn enter_room(&mut self, room_number: &str) -> Result<Transition, DomainError> {
        self.handle(WorkflowInput::EnterRoom(room_number.to_string()))
            .await
    }

    pub async fn select_outcome(&mut self, outcome: CallOutcome) -> Result<Transition, DomainError> {
        self.handle(WorkflowInput::SelectOutcome(outcome)).await
    }

    pub async fn confirm_order_presence(
        &mut self,
        did_order: bool,
    ) -> Result<Transition, DomainError> {
        self.handle(WorkflowInput::ConfirmOrderPresence(did_order))
            .await
    }

    pub async fn add_item(&mut self, item: &MenuItem) -> Result<Transition, DomainError> {
        self.handle(WorkflowInput::AddItem(item.clone())).await
    }

    pub async fn remove_item(&mut self, item_id: &str) -> Result<Transition, DomainError> {
        self.handle(WorkflowInput::RemoveItem(item_id.to_string()))
            .await
    }

    pub async fn submit_order(&mut self) -> Result<Transition, DomainError> {
        self.handle(WorkflowInput::SubmitOrder).await
    }

    pub async fn cancel(&mut self) -> Result<Transition, DomainError> {
        self.handle(WorkflowInput::Cancel).await
    }

    pub fn pending(&self) -> Option<&CallRecord> {
        self.pending.as_ref()
    }

    /// Try to save the pending record again; `Ok(false)` when none is pending
    pub async fn retry_pending(&mut self) -> Result<bool, DomainError> {
        let Some(record) = self.pending.take() else {
            return Ok(false);
        };
        if let Err(e) = self.log.append(record.clone()).await {
            self.pending = Some(record);
            return Err(e);
        }
        Ok(true)
    }

    pub fn discard_pending(&mut self) -> Option<CallRecord> {
        let dropped = self.pending.take();
        if let Some(record) = &dropped {
            tracing::warn!("🗑️  Discarded unsaved record for room {}", record.room_number());
        }
        dropped
    }

    pub async fn stats(&self) -> DailyStats {
        compute_daily_stats(&self.log.all().await)
    }

    pub async fn top_sellers(&self, limit: usize) -> Vec<ItemSales> {
        top_selling_items(&self.log.all().await, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedClock, MemoryStore};
    use crate::domain::{OrderStatus, WorkflowState};

    async fn desk() -> (Arc<MemoryStore>, CallDesk<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let log = Arc::new(RecordLog::load(store.clone()).await.unwrap());
        let clock = Arc::new(FixedClock::ymd_hm(2026, 3, 14, 20, 30).unwrap());
        (store, CallDesk::new(log, clock))
    }

    fn tea() -> MenuItem {
        MenuItem::new("tea", "Beverages", "Tea", 10)
    }

    #[tokio::test]
    async fn test_completion_is_appended_once() {
        let (_, mut desk) = desk().await;

        desk.enter_room("301").await.unwrap();
        desk.select_outcome(CallOutcome::Picked).await.unwrap();
        desk.confirm_order_presence(true).await.unwrap();
        desk.add_item(&tea()).await.unwrap();
        desk.add_item(&tea()).await.unwrap();
        let transition = desk.submit_order().await.unwrap();

        let record = transition.record().unwrap();
        assert_eq!(record.total_amount(), 20);
        assert_eq!(desk.workflow().state(), WorkflowState::RoomEntry);
        assert_eq!(desk.log().all().await, vec![record.clone()]);

        // Ignored inputs never append
        assert!(desk.submit_order().await.unwrap().is_ignored());
        assert_eq!(desk.log().len().await, 1);
    }

    #[tokio::test]
    async fn test_stats_follow_log() {
        let (_, mut desk) = desk().await;

        desk.enter_room("301").await.unwrap();
        desk.select_outcome(CallOutcome::NotPickedFinal).await.unwrap();
        desk.enter_room("302").await.unwrap();
        desk.select_outcome(CallOutcome::Picked).await.unwrap();
        desk.confirm_order_presence(false).await.unwrap();

        let stats = desk.stats().await;
        assert_eq!(stats.total_calls, 2);
        assert_eq!(stats.total_missed, 1);
        assert_eq!(stats.total_picked_not_ordered, 1);
        assert!(desk.top_sellers(5).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_append_keeps_record_pending() {
        let (store, mut desk) = desk().await;
        store.fail_writes(true);

        desk.enter_room("410").await.unwrap();
        let result = desk.select_outcome(CallOutcome::NotPickedAttempt2).await;

        assert!(matches!(result, Err(DomainError::Persistence(_))));
        assert_eq!(desk.workflow().state(), WorkflowState::RoomEntry);
        assert!(desk.log().is_empty().await);
        assert_eq!(
            desk.pending().map(|r| r.order_status()),
            Some(OrderStatus::NoResponse)
        );

        assert!(desk.retry_pending().await.is_err());
        assert!(desk.pending().is_some());

        store.fail_writes(false);
        assert!(desk.retry_pending().await.unwrap());
        assert!(desk.pending().is_none());
        assert_eq!(desk.log().len().await, 1);
        assert!(!desk.retry_pending().await.unwrap());
    }

    #[tokio::test]
    async fn test_discard_pending() {
        let (store, mut desk) = desk().await;
        store.fail_writes(true);

        desk.enter_room("410").await.unwrap();
        let _ = desk.confirm_order_presence(false).await;
        assert!(desk.pending().is_none());

        let _ = desk.select_outcome(CallOutcome::Picked).await;
        let _ = desk.confirm_order_presence(false).await;
        assert!(desk.discard_pending().is_some());
        assert!(desk.pending().is_none());
    }
}
