//! Application Layer
//!
//! Services that combine the domain with the ports: the shared record log,
//! the operator's call desk and the daily reset.

mod call_desk;
mod record_log;
mod reset_controller;
mod scheduler;

pub use call_desk::CallDesk;
pub use record_log::RecordLog;
pub use reset_controller::{
    ResetController, ResetEvent, ResetKind, ResetPolicy, TickOutcome, DEFAULT_RESET_HOUR,
};
pub use scheduler::{ResetScheduler, SchedulerConfig, DEFAULT_CHECK_INTERVAL};
