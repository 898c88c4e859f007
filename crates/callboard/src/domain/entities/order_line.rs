//! OrderLine and Cart - Items a guest ordered during a call

use serde::{Deserialize, Serialize};

use crate::domain::entities::MenuItem;

/// One ordered item with its quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: String,
    pub category: String,
    pub name: String,
    pub unit_price: u64,
    /// Always at least 1
    pub quantity: u32,
}

impl OrderLine {
    /// A fresh line for `item` with quantity 1
    pub fn from_item(item: &MenuItem) -> Self {
        Self {
            id: item.id.clone(),
            category: item.category.clone(),
            name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: 1,
        }
    }

    pub fn line_total(&self) -> u64 {
        self.unit_price * u64::from(self.quantity)
    }
}

/// Sum of `unit_price * quantity` over the lines
pub fn order_total(lines: &[OrderLine]) -> u64 {
    lines.iter().map(OrderLine::line_total).sum()
}

/// Cart - The in-progress order while items are being picked
///
/// Lines never share an id: adding an item that is already present bumps
/// its quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<OrderLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `item`, returning the quantity now in the cart
    pub fn add(&mut self, item: &MenuItem) -> u32 {
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == item.id) {
            line.quantity += 1;
            return line.quantity;
        }
        self.lines.push(OrderLine::from_item(item));
        1
    }

    /// Drop the whole line for `item_id`; returns whether a line was removed
    pub fn remove(&mut self, item_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != item_id);
        self.lines.len() != before
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> u64 {
        order_total(&self.lines)
    }

    pub fn into_lines(self) -> Vec<OrderLine> {
        self.lines
    }
}
