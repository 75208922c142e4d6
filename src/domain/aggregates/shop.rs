//! Shop Aggregate

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::Product;
use crate::domain::value_objects::Money;

/// A shop and the running totals over the products attributed to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: String,
    pub total_value: Money,
    pub total_products: u32,
    pub total_received_products: u32,
    pub total_received_value: Money,
}

/// Partial shop record carrying only the totals an operation changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_value: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_products: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_received_products: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_received_value: Option<Money>,
}

impl Shop {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            total_value: Money::zero(),
            total_products: 0,
            total_received_products: 0,
            total_received_value: Money::zero(),
        }
    }

    /// Recounts a shop's totals from scratch over the products attributed to it.
    /// Saturates instead of overflowing; only used to detect drift.
    pub fn tally(id: impl Into<String>, products: &[Product]) -> Self {
        let mut shop = Self::new(id);
        for product in products.iter().filter(|p| p.shop.id == shop.id) {
            shop.total_value = shop.total_value.saturating_plus(&product.price);
            shop.total_products = shop.total_products.saturating_add(1);
            if product.received {
                shop.total_received_products = shop.total_received_products.saturating_add(1);
                shop.total_received_value = shop.total_received_value.saturating_plus(&product.price);
            }
        }
        shop
    }

    /// Merges the provided fields in place; absent fields are left untouched.
    pub fn apply(&mut self, changes: &ShopChanges) {
        if let Some(value) = &changes.total_value { self.total_value = value.clone(); }
        if let Some(count) = changes.total_products { self.total_products = count; }
        if let Some(count) = changes.total_received_products { self.total_received_products = count; }
        if let Some(value) = &changes.total_received_value { self.total_received_value = value.clone(); }
    }

    pub fn with_changes(&self, changes: &ShopChanges) -> Self {
        let mut shop = self.clone();
        shop.apply(changes);
        shop
    }

    /// Received totals never exceed overall totals.
    pub fn is_consistent(&self) -> bool {
        self.total_received_products <= self.total_products
            && self.total_received_value.amount() <= self.total_value.amount()
    }

    pub fn totals_match(&self, other: &Shop) -> bool {
        self.total_value == other.total_value
            && self.total_products == other.total_products
            && self.total_received_products == other.total_received_products
            && self.total_received_value == other.total_received_value
    }
}
