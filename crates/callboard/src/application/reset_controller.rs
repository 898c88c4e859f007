//! Reset Controller - Daily-boundary clearing of the record log
//!
//! Once per local calendar date, after the configured hour, the log is
//! cleared and the date is stamped. Clear and stamp commit together.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use tokio::sync::{broadcast, Mutex};

use super::RecordLog;
use crate::domain::DomainError;
use crate::ports::{keys, Clock, KeyValueStore};

pub const DEFAULT_RESET_HOUR: u32 = 4;

const DATE_FORMAT: &str = "%Y-%m-%d";
const EVENT_CAPACITY: usize = 16;

/// When the automatic reset may fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetPolicy {
    reset_hour: u32,
}

impl ResetPolicy {
    /// `reset_hour` is a local hour in 0..=23
    pub fn new(reset_hour: u32) -> Result<Self, DomainError> {
        if reset_hour > 23 {
            return Err(DomainError::validation(format!(
                "reset hour must be between 0 and 23, got {}",
                reset_hour
            )));
        }
        Ok(Self { reset_hour })
    }

    pub fn reset_hour(&self) -> u32 {
        self.reset_hour
    }
}

impl Default for ResetPolicy {
    fn default() -> Self {
        Self {
            reset_hour: DEFAULT_RESET_HOUR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKind {
    Automatic,
    Manual,
}

/// Broadcast to observers after every successful reset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetEvent {
    pub kind: ResetKind,
    pub cleared: usize,
    /// Local calendar date the reset happened on
    pub date: NaiveDate,
    pub at: DateTime<Utc>,
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Disabled,
    BeforeResetHour,
    AlreadyReset(NaiveDate),
    /// Another tick was still running
    Busy,
    Reset(ResetEvent),
}

pub struct ResetController<S: KeyValueStore> {
    log: Arc<RecordLog<S>>,
    clock: Arc<dyn Clock>,
    policy: ResetPolicy,
    tick_guard: Mutex<()>,
    events: broadcast::Sender<ResetEvent>,
}

impl<S: KeyValueStore> ResetController<S> {
    pub fn new(log: Arc<RecordLog<S>>, clock: Arc<dyn Clock>, policy: ResetPolicy) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            log,
            clock,
            policy,
            tick_guard: Mutex::new(()),
            events,
        }
    }

    pub fn policy(&self) -> ResetPolicy {
        self.policy
    }

    /// Receive every reset that happens after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ResetEvent> {
        self.events.subscribe()
    }

    /// Persisted switch; missing means enabled
    pub async fn auto_reset_enabled(&self) -> Result<bool, DomainError> {
        match self.log.store().get(keys::AUTO_RESET_ENABLED).await? {
            None => Ok(true),
            Some(raw) => match raw.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                other => {
                    tracing::warn!(
                        "⚠️  Unrecognized {} value '{}', treating as enabled",
                        keys::AUTO_RESET_ENABLED,
                        other
                    );
                    Ok(true)
                }
            },
        }
    }

    pub async fn set_auto_reset_enabled(&self, enabled: bool) -> Result<(), DomainError> {
        self.log
            .store()
            .set(keys::AUTO_RESET_ENABLED, if enabled { "true" } else { "false" })
            .await?;
        tracing::info!(
            "🔁 Auto reset {}",
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    /// Date of the last automatic reset, if any was recorded
    pub async fn last_reset_date(&self) -> Result<Option<NaiveDate>, DomainError> {
        let Some(raw) = self.log.store().get(keys::LAST_RESET_DATE).await? else {
            return Ok(None);
        };
        match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                tracing::warn!("⚠️  Ignoring unreadable last reset date '{}': {}", raw, e);
                Ok(None)
            }
        }
    }

    /// One check-and-act pass of the automatic reset
    pub async fn tick(&self) -> Result<TickOutcome, DomainError> {
        let Ok(_guard) = self.tick_guard.try_lock() else {
            tracing::debug!("Reset tick skipped: previous tick still running");
            return Ok(TickOutcome::Busy);
        };

        if !self.auto_reset_enabled().await? {
            return Ok(TickOutcome::Disabled);
        }

        let now = self.clock.now_local();
        if now.hour() < self.policy.reset_hour {
            return Ok(TickOutcome::BeforeResetHour);
        }

        let today = now.date_naive();
        if self.last_reset_date().await? == Some(today) {
            return Ok(TickOutcome::AlreadyReset(today));
        }

        let store = Arc::clone(self.log.store());
        let stamp = today.format(DATE_FORMAT).to_string();
        let cleared = self
            .log
            .clear_then(move || async move { store.set(keys::LAST_RESET_DATE, &stamp).await })
            .await?;

        let event = self.publish(ResetKind::Automatic, cleared);
        tracing::info!(
            "🌅 Daily reset for {} cleared {} records",
            event.date,
            event.cleared
        );
        Ok(TickOutcome::Reset(event))
    }

    /// Operator-requested clear; leaves the automatic reset date alone
    pub async fn reset_now(&self) -> Result<ResetEvent, DomainError> {
        let cleared = self.log.clear().await?;
        let event = self.publish(ResetKind::Manual, cleared);
        tracing::info!("🧹 Manual reset cleared {} records", event.cleared);
        Ok(event)
    }

    fn publish(&self, kind: ResetKind, cleared: usize) -> ResetEvent {
        let event = ResetEvent {
            kind,
            cleared,
            date: self.clock.now_local().date_naive(),
            at: self.clock.now(),
        };
        // No subscribers is fine
        let _ = self.events.send(event.clone());
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedClock, MemoryStore};
    use crate::domain::{CallRecord, RoomNumber};
    use chrono::Duration;

    struct Fixture {
        store: Arc<MemoryStore>,
        log: Arc<RecordLog<MemoryStore>>,
        clock: Arc<FixedClock>,
        controller: ResetController<MemoryStore>,
    }

    async fn fixture(hour: u32, minute: u32) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let log = Arc::new(RecordLog::load(store.clone()).await.unwrap());
        let clock = Arc::new(FixedClock::ymd_hm(2026, 3, 14, hour, minute).unwrap());
        let controller = ResetController::new(log.clone(), clock.clone(), ResetPolicy::default());
        Fixture {
            store,
            log,
            clock,
            controller,
        }
    }

    async fn add_record(f: &Fixture) {
        let room = RoomNumber::parse("204").unwrap();
        f.log
            .append(CallRecord::not_ordered(room, f.clock.now()))
            .await
            .unwrap();
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_policy_rejects_out_of_range_hour() {
        assert!(ResetPolicy::new(23).is_ok());
        assert!(ResetPolicy::new(24).is_err());
        assert_eq!(ResetPolicy::default().reset_hour(), 4);
    }

    #[tokio::test]
    async fn test_tick_resets_once_per_day() {
        let f = fixture(4, 5).await;
        f.store
            .set(keys::LAST_RESET_DATE, "2026-03-13")
            .await
            .unwrap();
        add_record(&f).await;
        add_record(&f).await;

        let outcome = f.controller.tick().await.unwrap();
        match outcome {
            TickOutcome::Reset(event) => {
                assert_eq!(event.kind, ResetKind::Automatic);
                assert_eq!(event.cleared, 2);
                assert_eq!(event.date, date(2026, 3, 14));
            }
            other => panic!("expected reset, got {:?}", other),
        }
        assert!(f.log.is_empty().await);
        assert_eq!(
            f.controller.last_reset_date().await.unwrap(),
            Some(date(2026, 3, 14))
        );

        add_record(&f).await;
        f.clock.advance(Duration::hours(3));
        assert_eq!(
            f.controller.tick().await.unwrap(),
            TickOutcome::AlreadyReset(date(2026, 3, 14))
        );
        assert_eq!(f.log.len().await, 1);
    }

    #[tokio::test]
    async fn test_tick_waits_for_reset_hour() {
        let f = fixture(3, 59).await;
        add_record(&f).await;

        assert_eq!(
            f.controller.tick().await.unwrap(),
            TickOutcome::BeforeResetHour
        );
        assert_eq!(f.log.len().await, 1);

        f.clock.advance(Duration::minutes(1));
        assert!(matches!(
            f.controller.tick().await.unwrap(),
            TickOutcome::Reset(_)
        ));
    }

    #[tokio::test]
    async fn test_first_run_without_stamp_resets() {
        let f = fixture(9, 0).await;
        assert_eq!(f.controller.last_reset_date().await.unwrap(), None);
        assert!(matches!(
            f.controller.tick().await.unwrap(),
            TickOutcome::Reset(_)
        ));
    }

    #[tokio::test]
    async fn test_disabled_tick_does_nothing() {
        let f = fixture(9, 0).await;
        add_record(&f).await;
        f.controller.set_auto_reset_enabled(false).await.unwrap();

        assert!(!f.controller.auto_reset_enabled().await.unwrap());
        assert_eq!(f.controller.tick().await.unwrap(), TickOutcome::Disabled);
        assert_eq!(f.log.len().await, 1);
        assert_eq!(f.store.snapshot(keys::LAST_RESET_DATE), None);
    }

    #[tokio::test]
    async fn test_auto_reset_defaults_to_enabled() {
        let f = fixture(9, 0).await;
        assert!(f.controller.auto_reset_enabled().await.unwrap());

        f.store.set(keys::AUTO_RESET_ENABLED, "maybe").await.unwrap();
        assert!(f.controller.auto_reset_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_stamp_keeps_records() {
        let f = fixture(9, 0).await;
        add_record(&f).await;
        f.store.fail_writes(true);

        assert!(f.controller.tick().await.is_err());
        assert_eq!(f.log.len().await, 1);
        assert_eq!(f.controller.last_reset_date().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_manual_reset_leaves_stamp_untouched() {
        let f = fixture(9, 0).await;
        f.store
            .set(keys::LAST_RESET_DATE, "2026-03-13")
            .await
            .unwrap();
        add_record(&f).await;

        let mut events = f.controller.subscribe();
        let event = f.controller.reset_now().await.unwrap();

        assert_eq!(event.kind, ResetKind::Manual);
        assert_eq!(event.cleared, 1);
        assert_eq!(events.recv().await.unwrap(), event);
        assert_eq!(
            f.controller.last_reset_date().await.unwrap(),
            Some(date(2026, 3, 13))
        );
    }

    #[tokio::test]
    async fn test_tick_is_skipped_while_another_runs() {
        let f = fixture(9, 0).await;
        let _held = f.controller.tick_guard.lock().await;
        assert_eq!(f.controller.tick().await.unwrap(), TickOutcome::Busy);
    }
}
