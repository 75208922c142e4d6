//! Domain events
use crate::domain::aggregates::{Product, ShopChanges};
use crate::domain::value_objects::ProductId;

/// State mutations accepted by the store. These are the only way shared
/// shop/product state changes.
#[derive(Clone, Debug, PartialEq)]
pub enum ShoppingEvent {
    ProductAdded { product: Product },
    ShopUpdated { id: String, changes: ShopChanges },
    ProductRemoved { id: ProductId },
    ProductUpdated { id: ProductId, received: bool },
}

impl ShoppingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProductAdded { .. } => "product_added",
            Self::ShopUpdated { .. } => "shop_updated",
            Self::ProductRemoved { .. } => "product_removed",
            Self::ProductUpdated { .. } => "product_updated",
        }
    }
}
