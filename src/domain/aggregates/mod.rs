//! Aggregates module
pub mod product;
pub mod shop;

pub use product::Product;
pub use shop::{Shop, ShopChanges};
