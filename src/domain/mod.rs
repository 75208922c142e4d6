//! Shopping domain: value objects, aggregates and events
pub mod aggregates;
pub mod events;
pub mod value_objects;

pub use aggregates::{Product, Shop, ShopChanges};
pub use events::ShoppingEvent;
pub use value_objects::{Money, ProductId};
