//! Product Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::Shop;
use crate::domain::value_objects::{Money, ProductId};

/// A product on the list. `shop` is a snapshot of the owning shop taken at
/// creation time; the authoritative shop record lives in the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub received: bool,
    pub delivery_est_date: DateTime<Utc>,
    pub shop: Shop,
}

impl Product {
    pub fn create(name: impl Into<String>, price: Money, delivery_est_date: DateTime<Utc>, shop: &Shop) -> Self {
        Self {
            id: ProductId::generate(),
            name: name.into(),
            price,
            received: false,
            delivery_est_date,
            shop: shop.clone(),
        }
    }

    pub fn shop_id(&self) -> &str { &self.shop.id }

    pub fn toggle_received(&mut self) { self.received = !self.received; }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_product_create() {
        let shop = Shop::new("s1");
        let p = Product::create("Kettle", Money::usd(Decimal::new(1999, 2)), Utc::now(), &shop);
        assert_eq!(p.name, "Kettle");
        assert!(!p.received);
        assert_eq!(p.shop_id(), "s1");
        assert!(p.id.as_str().starts_with('p'));
    }

    #[test]
    fn test_snapshot_is_detached_from_shop() {
        let mut shop = Shop::new("s1");
        let p = Product::create("Kettle", Money::usd(Decimal::new(20, 0)), Utc::now(), &shop);
        shop.total_products = 7;
        assert_eq!(p.shop.total_products, 0);
    }

    #[test]
    fn test_deserialize_asset_record() {
        let json = r#"{
            "id": "p1", "name": "Chair", "price": {"USD": 49.9}, "received": true,
            "deliveryEstDate": "2020-11-30T23:00:00.000Z",
            "shop": {"id":"s1","totalValue":{"USD":0},"totalProducts":0,"totalReceivedProducts":0,"totalReceivedValue":{"USD":0}}
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert!(p.received);
        assert_eq!(p.price.amount(), Decimal::new(499, 1));
        assert_eq!(p.id.as_str(), "p1");
    }
}
