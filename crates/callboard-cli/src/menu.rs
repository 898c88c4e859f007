//! Room-service menu
//!
//! The property's built-in menu, or a TOML catalog file with the same shape:
//!
//! ```toml
//! categories = ["HOT BEVERAGE"]
//!
//! [[items]]
//! id = "hb2"
//! category = "HOT BEVERAGE"
//! name = "Tea"
//! unit_price = 10
//! is_vegetarian = true
//! ```

use anyhow::{Context, Result};
use callboard::{Catalog, MenuItem};
use std::fs;
use std::path::Path;

const CATEGORIES: [&str; 10] = [
    "STARTERS",
    "SOUP",
    "SALADS",
    "SANDWICHES",
    "Taste of India",
    "Arabian Taste",
    "Italian Taste",
    "DESSERT",
    "HOT BEVERAGE",
    "COLD BEVERAGE",
];

const V: bool = true;
const S: bool = true;
const N: bool = false;

/// id, category, name, price, description, served with, vegetarian, spicy
type Row = (
    &'static str,
    &'static str,
    &'static str,
    u64,
    &'static str,
    Option<&'static str>,
    bool,
    bool,
);

#[rustfmt::skip]
const ITEMS: [Row; 49] = [
    ("st1", "STARTERS", "French Fries", 12, "Crispy golden potato fries", None, V, N),
    ("st2", "STARTERS", "Vegetable Spring Rolls (6 Pcs)", 16, "Crispy rolls with vegetable filling", None, V, N),
    ("st3", "STARTERS", "Meat Kibbeh (6 Pcs)", 16, "Fried bulgur wheat balls stuffed with minced meat", None, N, N),
    ("st4", "STARTERS", "Cheese Rolls (6 Pcs)", 16, "Crispy rolls filled with cheese", None, V, N),
    ("st5", "STARTERS", "Vegetable Samosa (6 Pcs)", 16, "Fried pastry with savory vegetable filling", None, V, S),
    ("st6", "STARTERS", "BBQ Chicken Wings", 25, "Chicken wings tossed in BBQ sauce", None, N, N),
    ("sp1", "SOUP", "Lentil Soup", 15, "Traditional lentil soup", None, V, N),
    ("sp2", "SOUP", "Vegetable Soup", 15, "Mixed vegetable soup", None, V, N),
    ("sp3", "SOUP", "Chicken Soup", 15, "Clear soup with chicken pieces", None, N, N),
    ("sp4", "SOUP", "Chicken Cream Soup", 15, "Creamy soup with chicken", None, N, N),
    ("sl1", "SALADS", "Quinoa Salad", 20, "Healthy quinoa with fresh vegetables", None, V, N),
    ("sl2", "SALADS", "Fattoush Salad", 18, "Mixed greens with toasted bread and sumac", None, V, N),
    ("sl3", "SALADS", "Caesar Salad", 18, "Romaine lettuce, parmesan cheese, croutons", None, V, N),
    ("sw1", "SANDWICHES", "Beef Burger Platter", 23, "Juicy beef patty served with fries", None, N, N),
    ("sw2", "SANDWICHES", "Chicken Burger Platter", 20, "Chicken patty served with fries", None, N, N),
    ("sw3", "SANDWICHES", "Club Sandwich Platter", 23, "Triple decker sandwich served with fries", None, N, N),
    ("sw4", "SANDWICHES", "Chicken Shawarma", 20, "Traditional chicken shawarma wrap", None, N, N),
    ("sw5", "SANDWICHES", "Chicken Tikka", 20, "Spiced chicken tikka sandwich", None, N, S),
    ("in1", "Taste of India", "Chicken Biryani", 30, "Aromatic basmati rice with spiced chicken", None, N, S),
    ("in2", "Taste of India", "Vegetable Biryani", 25, "Aromatic basmati rice with mixed vegetables", None, V, S),
    ("in3", "Taste of India", "Paneer Tikka Masala (Rice)", 20, "Cottage cheese in spiced gravy served with rice", None, V, S),
    ("in4", "Taste of India", "Butter Chicken (Rice)", 30, "Chicken in creamy tomato gravy served with rice", None, N, N),
    ("in5", "Taste of India", "Chicken Tikka & Fries (Boneless)", 30, "Boneless chicken tikka pieces served with fries", None, N, S),
    ("in6", "Taste of India", "Chapatti", 2, "Fresh Indian flatbread", None, V, N),
    ("in7", "Taste of India", "Paratha", 3, "Layered Indian flatbread", None, V, N),
    ("ar1", "Arabian Taste", "Grilled Chicken Rosemary Sauce (Rice)", 30, "Grilled chicken breast with rosemary sauce and rice", None, N, N),
    ("ar2", "Arabian Taste", "Chicken Wings Provincial & Rice", 20, "Provincial style chicken wings served with rice", None, N, N),
    ("ar3", "Arabian Taste", "Chicken Shish Taouk", 35, "Grilled marinated chicken skewers (Fries-Bread)", Some("Fries-Bread"), N, N),
    ("ar4", "Arabian Taste", "Mixed Grilled", 50, "Assortment of grilled meats (Fries-Bread)", Some("Fries-Bread"), N, N),
    ("ar5", "Arabian Taste", "Chicken Mandi", 30, "Traditional mandi rice with chicken", None, N, N),
    ("ar6", "Arabian Taste", "Grilled Hamour Fillet", 45, "Grilled fish fillet served with fries", Some("Fries"), N, N),
    ("it1", "Italian Taste", "Spaghetti with Meat Balls", 25, "Spaghetti pasta with tomato sauce and meatballs", None, N, N),
    ("it2", "Italian Taste", "Pizza Margarita", 20, "Classic cheese and tomato pizza", None, V, N),
    ("it3", "Italian Taste", "Pizza Pepperoni", 25, "Pizza topped with pepperoni slices", None, N, S),
    ("it4", "Italian Taste", "Chicken BBQ Pizza", 25, "Pizza topped with BBQ chicken", None, N, N),
    ("it5", "Italian Taste", "Pasta Arabiatta", 20, "Pasta in spicy tomato sauce", None, V, S),
    ("it6", "Italian Taste", "Pasta with Chicken", 22, "Pasta with chicken", None, N, N),
    ("it7", "Italian Taste", "Pesto Sauce Pasta", 22, "Pasta tossed in basil pesto sauce", None, V, N),
    ("it8", "Italian Taste", "Alfredo Pasta", 22, "Pasta in creamy alfredo sauce", None, V, N),
    ("ds1", "DESSERT", "Fruit Salad", 25, "Fresh mixed fruit salad", None, V, N),
    ("ds2", "DESSERT", "Cut Fruits Platter", 25, "Platter of seasonal cut fruits", None, V, N),
    ("hb1", "HOT BEVERAGE", "Turkish Coffee", 12, "Traditional Turkish coffee", None, V, N),
    ("hb2", "HOT BEVERAGE", "Tea", 10, "Black or Green tea", None, V, N),
    ("hb3", "HOT BEVERAGE", "Americano", 10, "Black coffee", None, V, N),
    ("hb4", "HOT BEVERAGE", "Cappuccino", 10, "Coffee with frothy milk", None, V, N),
    ("cb1", "COLD BEVERAGE", "Fresh Juice", 12, "Watermelon, Orange, or Pineapple", None, V, N),
    ("cb2", "COLD BEVERAGE", "Soft Drink", 5, "Assorted carbonated drinks", None, V, N),
    ("cb3", "COLD BEVERAGE", "Water 1.5L", 5, "Large mineral water bottle", None, V, N),
    ("cb4", "COLD BEVERAGE", "Water 500ml", 3, "Small mineral water bottle", None, V, N),
];

/// The property's own room-service menu
pub fn builtin() -> Result<Catalog> {
    let items = ITEMS
        .iter()
        .map(|&(id, category, name, price, description, served_with, veg, spicy)| {
            let mut item = MenuItem::new(id, category, name, price).with_description(description);
            if let Some(side) = served_with {
                item = item.with_served_with(side);
            }
            if veg {
                item = item.vegetarian();
            }
            if spicy {
                item = item.spicy();
            }
            item
        })
        .collect();

    let categories = CATEGORIES.iter().map(|c| c.to_string()).collect();
    Catalog::new(categories, items).context("Built-in menu is inconsistent")
}

/// Load a catalog file, or the built-in menu when no path is configured
pub fn load(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return builtin();
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog from {:?}", path))?;
    let catalog: Catalog = toml::from_str(&content)
        .with_context(|| format!("Failed to parse catalog file {:?}", path))?;

    tracing::info!("📋 Loaded {} menu items from {:?}", catalog.len(), path);
    Ok(catalog)
}
