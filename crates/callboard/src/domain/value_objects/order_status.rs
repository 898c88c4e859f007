//! OrderStatus - Whether a call produced an order

use serde::{Deserialize, Serialize};

/// Order status of a finished call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Ordered,
    NotOrdered,
    /// The guest never answered
    NoResponse,
}

impl OrderStatus {
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Ordered => "Ordered",
            OrderStatus::NotOrdered => "Not Ordered",
            OrderStatus::NoResponse => "No Response",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
