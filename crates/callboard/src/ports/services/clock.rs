//! Clock Port
//!
//! Wall-clock access, so record timestamps and the daily boundary can be
//! driven by a fixed clock in tests.

use chrono::{DateTime, FixedOffset, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant with the device's local UTC offset
    fn now_local(&self) -> DateTime<FixedOffset>;

    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc> {
        self.now_local().with_timezone(&Utc)
    }
}
