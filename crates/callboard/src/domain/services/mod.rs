//! Domain Services
//!
//! Stateless or session-scoped logic over domain entities.

pub mod aggregation;
pub mod workflow;

pub use aggregation::{
    compute_daily_stats, top_selling_items, DailyStats, ItemSales, OutcomeBreakdown,
    DEFAULT_TOP_LIMIT,
};
pub use workflow::{CallWorkflow, Transition, WorkflowInput, WorkflowState};
