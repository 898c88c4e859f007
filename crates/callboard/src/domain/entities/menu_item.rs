//! MenuItem - A sellable catalog entry
//!
//! Pure domain entity without infrastructure dependencies.

use serde::{Deserialize, Serialize};

/// MenuItem - One item guests can order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique identifier within the catalog (e.g. "hb2")
    pub id: String,
    /// Category name, one of the catalog's declared categories
    pub category: String,
    pub name: String,
    /// Price in whole currency units
    pub unit_price: u64,
    #[serde(default)]
    pub description: String,
    /// Side served with the dish, if any (e.g. "Fries-Bread")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub served_with: Option<String>,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_spicy: bool,
}

impl MenuItem {
    /// Create a non-vegetarian, non-spicy item without description
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
        unit_price: u64,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            name: name.into(),
            unit_price,
            description: String::new(),
            served_with: None,
            is_vegetarian: false,
            is_spicy: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_served_with(mut self, served_with: impl Into<String>) -> Self {
        self.served_with = Some(served_with.into());
        self
    }

    pub fn vegetarian(mut self) -> Self {
        self.is_vegetarian = true;
        self
    }

    pub fn spicy(mut self) -> Self {
        self.is_spicy = true;
        self
    }
}
