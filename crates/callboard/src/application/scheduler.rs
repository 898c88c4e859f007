//! Reset Scheduler - Periodic driver for the reset controller
//!
//! Ticks once at startup, then on every interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use super::{ResetController, TickOutcome};
use crate::ports::KeyValueStore;

pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between reset checks
    pub interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}

/// Reset scheduler
pub struct ResetScheduler<S: KeyValueStore> {
    controller: Arc<ResetController<S>>,
    config: SchedulerConfig,
}

impl<S: KeyValueStore + 'static> ResetScheduler<S> {
    pub fn new(controller: Arc<ResetController<S>>, config: Option<SchedulerConfig>) -> Self {
        Self {
            controller,
            config: config.unwrap_or_default(),
        }
    }

    /// Start the scheduler (runs in background until the handle is aborted)
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(self) {
        tracing::info!(
            "📅 Reset scheduler started (interval: {:?}, reset hour: {})",
            self.config.interval,
            self.controller.policy().reset_hour()
        );

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            // The first tick completes immediately: that is the startup check
            ticker.tick().await;

            match self.controller.tick().await {
                Ok(TickOutcome::Reset(event)) => {
                    tracing::info!("🔄 Scheduler: reset fired ({} records)", event.cleared);
                }
                Ok(outcome) => {
                    tracing::debug!("Scheduler: nothing to do ({:?})", outcome);
                }
                Err(e) => {
                    tracing::warn!("  ❌ Reset check failed: {}", e);
                }
            }
        }
    }
}
