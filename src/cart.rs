//! Shopping cart state for the demo.
//!
//! The cart is plain data: every operation here is a pure mutation of
//! `CartState`, meant to be applied through `Store::patch` so that the
//! history engine sees one organic change per call.

use crate::products::Product;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// State of the cart store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<Product>,
}

impl CartState {
    /// Add `count` copies of `item`.
    pub fn add_item(&mut self, count: usize, item: &Product) {
        for _ in 0..count {
            self.items.push(item.clone());
        }
    }

    /// Remove every item called `name`.
    pub fn remove_item(&mut self, name: &str) {
        self.items.retain(|item| item.name != name);
    }

    /// Replace the count of `item` with `count`.
    pub fn update_item_count(&mut self, count: usize, item: &Product) {
        self.remove_item(&item.name);
        self.add_item(count, item);
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items grouped by name, names in sorted order.
    pub fn grouped_items(&self) -> BTreeMap<&str, Vec<&Product>> {
        let mut grouped: BTreeMap<&str, Vec<&Product>> = BTreeMap::new();
        for item in &self.items {
            grouped.entry(item.name.as_str()).or_default().push(item);
        }
        grouped
    }

    /// Number of items called `name`.
    pub fn count_of(&self, name: &str) -> usize {
        self.items.iter().filter(|item| item.name == name).count()
    }

    pub fn total_price(&self) -> f64 {
        self.items.iter().map(|item| item.price).sum()
    }

    /// One-line summary, e.g. `Dried Pineapple x2, Pineapple Gum x1 ($13.00)`.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "(empty)".to_string();
        }
        let lines: Vec<String> = self
            .grouped_items()
            .iter()
            .map(|(name, items)| format!("{} x{}", name, items.len()))
            .collect();
        format!("{} (${:.2})", lines.join(", "), self.total_price())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: f64) -> Product {
        Product {
            name: name.to_string(),
            image: format!("{}.jpg", name.to_lowercase().replace(' ', "-")),
            price,
        }
    }

    #[test]
    fn test_add_and_remove() {
        let gum = product("Pineapple Gum", 3.0);
        let dried = product("Dried Pineapple", 5.0);
        let mut cart = CartState::default();

        cart.add_item(2, &gum);
        cart.add_item(1, &dried);
        assert_eq!(cart.total_count(), 3);
        assert_eq!(cart.count_of("Pineapple Gum"), 2);

        cart.remove_item("Pineapple Gum");
        assert_eq!(cart.total_count(), 1);
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_update_item_count() {
        let gum = product("Pineapple Gum", 3.0);
        let mut cart = CartState::default();
        cart.add_item(5, &gum);

        cart.update_item_count(2, &gum);
        assert_eq!(cart.count_of("Pineapple Gum"), 2);

        cart.update_item_count(0, &gum);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_grouped_items_sorted() {
        let mut cart = CartState::default();
        cart.add_item(1, &product("Pineapple Gum", 3.0));
        cart.add_item(2, &product("Dried Pineapple", 5.0));

        let names: Vec<&str> = cart.grouped_items().keys().copied().collect();
        assert_eq!(names, vec!["Dried Pineapple", "Pineapple Gum"]);
        assert_eq!(cart.grouped_items()["Dried Pineapple"].len(), 2);
    }

    #[test]
    fn test_total_price_and_summary() {
        let mut cart = CartState::default();
        assert_eq!(cart.summary(), "(empty)");

        cart.add_item(1, &product("Pineapple Gum", 3.0));
        cart.add_item(2, &product("Dried Pineapple", 5.0));

        assert_eq!(cart.total_price(), 13.0);
        assert_eq!(
            cart.summary(),
            "Dried Pineapple x2, Pineapple Gum x1 ($13.00)"
        );
    }
}
