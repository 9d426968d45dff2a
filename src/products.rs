//! Product catalogue for the cart demo.

use serde::{Deserialize, Serialize};

const CATALOGUE: &str = include_str!("data/products.json");

/// A product that can be put in the cart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub image: String,
    pub price: f64,
}

/// State of the product store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductState {
    pub products: Vec<Product>,
}

impl ProductState {
    /// Load the bundled catalogue.
    pub fn fetch_products(&mut self) -> Result<(), serde_json::Error> {
        self.products = serde_json::from_str(CATALOGUE)?;
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }
}
