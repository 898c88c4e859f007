//! Aggregation - Daily statistics over the record log
//!
//! Pure functions over a snapshot of records. Nothing here is stored; the
//! numbers are recomputed on every read.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::entities::CallRecord;
use crate::domain::value_objects::OrderStatus;

/// Default number of entries in the top sellers list
pub const DEFAULT_TOP_LIMIT: usize = 5;

/// Same-day call statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    pub total_calls: u64,
    pub total_picked: u64,
    /// `total_calls - total_picked`
    pub total_missed: u64,
    pub total_ordered: u64,
    /// `total_picked - total_ordered`
    pub total_picked_not_ordered: u64,
    pub total_revenue: u64,
    /// Ordered calls as a share of all calls, rounded half up; 0 without calls
    pub conversion_rate_percent: u32,
}

/// Share of all calls per final status, in percent (0.0 without calls)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OutcomeBreakdown {
    pub ordered: f64,
    pub picked_not_ordered: f64,
    pub missed: f64,
}

impl DailyStats {
    pub fn breakdown(&self) -> OutcomeBreakdown {
        if self.total_calls == 0 {
            return OutcomeBreakdown::default();
        }
        let share = |n: u64| n as f64 * 100.0 / self.total_calls as f64;
        OutcomeBreakdown {
            ordered: share(self.total_ordered),
            picked_not_ordered: share(self.total_picked_not_ordered),
            missed: share(self.total_missed),
        }
    }
}

/// Units sold of one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSales {
    pub name: String,
    pub quantity: u64,
}

/// Compute the daily statistics for `records`
pub fn compute_daily_stats(records: &[CallRecord]) -> DailyStats {
    let total_calls = records.len() as u64;
    let total_picked = records.iter().filter(|r| r.outcome().is_picked()).count() as u64;
    let total_ordered = records
        .iter()
        .filter(|r| r.order_status() == OrderStatus::Ordered)
        .count() as u64;
    let total_revenue = records.iter().map(CallRecord::total_amount).sum();

    DailyStats {
        total_calls,
        total_picked,
        total_missed: total_calls - total_picked,
        total_ordered,
        total_picked_not_ordered: total_picked - total_ordered,
        total_revenue,
        conversion_rate_percent: rounded_percent(total_ordered, total_calls),
    }
}

/// Best sellers by summed quantity, grouped by item name
///
/// Ties keep the order in which the items were first ordered.
pub fn top_selling_items(records: &[CallRecord], limit: usize) -> Vec<ItemSales> {
    let mut sales: Vec<ItemSales> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records
        .iter()
        .filter(|r| r.order_status() == OrderStatus::Ordered)
    {
        for line in record.ordered_lines() {
            match index.get(line.name.as_str()) {
                Some(&i) => sales[i].quantity += u64::from(line.quantity),
                None => {
                    index.insert(line.name.as_str(), sales.len());
                    sales.push(ItemSales {
                        name: line.name.clone(),
                        quantity: u64::from(line.quantity),
                    });
                }
            }
        }
    }

    // sort_by is stable, so equal quantities stay in first-seen order
    sales.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    sales.truncate(limit);
    sales
}

fn rounded_percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    let percent = (200 * part + whole) / (2 * whole);
    u32::try_from(percent).unwrap_or(u32::MAX)
}
