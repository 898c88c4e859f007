//! Callboard Library
//!
//! Call tracking for hotel room-service outreach: an operator calls rooms,
//! records whether the guest picked up and what they ordered, and reads the
//! day's conversion and revenue figures until the daily reset clears them.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (CallRecord, Catalog, MenuItem, Cart)
//!   - `value_objects/`: Immutable value types (CallOutcome, OrderStatus, RoomNumber)
//!   - `services/`: Call workflow state machine and daily aggregation
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Key-value persistence
//!   - `services/`: Clock
//!
//! - **Application** (`application/`): Record log, call desk, daily reset
//!
//! - **Adapters** (`adapters/`): In-memory store, system and fixed clocks
//!
//! # Usage
//!
//! ```rust,ignore
//! use callboard::{CallDesk, CallOutcome, MemoryStore, RecordLog, SystemClock};
//!
//! let log = Arc::new(RecordLog::load(Arc::new(MemoryStore::new())).await?);
//! let mut desk = CallDesk::new(log, Arc::new(SystemClock));
//! desk.enter_room("204").await?;
//! desk.select_outcome(CallOutcome::NotPickedAttempt1).await?;
//! ```

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use adapters::{FixedClock, MemoryStore, SystemClock};
pub use application::{
    CallDesk, RecordLog, ResetController, ResetEvent, ResetKind, ResetPolicy, ResetScheduler,
    SchedulerConfig, TickOutcome,
};
pub use domain::{
    compute_daily_stats, top_selling_items, CallDisposition, CallOutcome, CallRecord,
    CallWorkflow, Cart, Catalog, DailyStats, DomainError, ItemSales, MenuItem, MissedAttempt,
    OrderLine, OrderStatus, RoomNumber, Transition, WorkflowInput, WorkflowState,
};
pub use ports::{Clock, KeyValueStore};
