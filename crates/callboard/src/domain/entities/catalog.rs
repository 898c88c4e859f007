//! Catalog - Ordered menu categories and their items

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::entities::MenuItem;
use crate::domain::errors::DomainError;

/// Read-only menu: categories in display order, items in display order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CatalogData", into = "CatalogData")]
pub struct Catalog {
    categories: Vec<String>,
    items: Vec<MenuItem>,
}

/// Unvalidated catalog shape, as stored in a catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub categories: Vec<String>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl Catalog {
    /// Build a catalog, checking that categories are unique, item ids are
    /// unique and every item belongs to a declared category
    pub fn new(categories: Vec<String>, items: Vec<MenuItem>) -> Result<Self, DomainError> {
        let mut declared = HashSet::new();
        for category in &categories {
            if category.trim().is_empty() {
                return Err(DomainError::validation("catalog has an empty category name"));
            }
            if !declared.insert(category.as_str()) {
                return Err(DomainError::validation(format!(
                    "category '{}' is declared twice",
                    category
                )));
            }
        }

        let mut ids = HashSet::new();
        for item in &items {
            if item.id.trim().is_empty() {
                return Err(DomainError::validation(format!(
                    "item '{}' has an empty id",
                    item.name
                )));
            }
            if !ids.insert(item.id.as_str()) {
                return Err(DomainError::validation(format!(
                    "item id '{}' is used twice",
                    item.id
                )));
            }
            if !declared.contains(item.category.as_str()) {
                return Err(DomainError::validation(format!(
                    "item '{}' uses undeclared category '{}'",
                    item.id, item.category
                )));
            }
        }

        Ok(Self { categories, items })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items of one category, in catalog order
    pub fn items_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a MenuItem> + 'a {
        self.items.iter().filter(move |item| item.category == category)
    }

    pub fn find(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Case-insensitive substring search over item names and descriptions
    pub fn search(&self, term: &str) -> Vec<&MenuItem> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.items.iter().collect();
        }

        self.items
            .iter()
            .filter(|item| {
                item.name.to_lowercase().contains(&needle)
                    || item.description.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

impl TryFrom<CatalogData> for Catalog {
    type Error = DomainError;

    fn try_from(data: CatalogData) -> Result<Self, Self::Error> {
        Catalog::new(data.categories, data.items)
    }
}

impl From<Catalog> for CatalogData {
    fn from(catalog: Catalog) -> Self {
        Self {
            categories: catalog.categories,
            items: catalog.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drinks() -> Catalog {
        Catalog::new(
            vec!["HOT BEVERAGE".to_string(), "COLD BEVERAGE".to_string()],
            vec![
                MenuItem::new("hb1", "HOT BEVERAGE", "Turkish Coffee", 12)
                    .with_description("Traditional Turkish coffee"),
                MenuItem::new("cb1", "COLD BEVERAGE", "Fresh Juice", 12)
                    .with_description("Watermelon, Orange, or Pineapple"),
                MenuItem::new("hb2", "HOT BEVERAGE", "Tea", 10)
                    .with_description("Black or Green tea"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_items_in_keeps_catalog_order() {
        let catalog = drinks();
        let ids: Vec<_> = catalog.items_in("HOT BEVERAGE").map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["hb1", "hb2"]);
    }

    #[test]
    fn test_search_matches_name_and_description() {
        let catalog = drinks();
        assert_eq!(catalog.search("orange").len(), 1);
        assert_eq!(catalog.search("COFFEE")[0].id, "hb1");
        assert_eq!(catalog.search("  ").len(), 3);
    }

    #[test]
    fn test_rejects_undeclared_category() {
        let err = Catalog::new(
            vec!["SOUP".to_string()],
            vec![MenuItem::new("st1", "STARTERS", "French Fries", 12)],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = Catalog::new(
            vec!["SOUP".to_string()],
            vec![
                MenuItem::new("sp1", "SOUP", "Lentil Soup", 15),
                MenuItem::new("sp1", "SOUP", "Vegetable Soup", 15),
            ],
        );
        assert!(result.is_err());
    }
}
