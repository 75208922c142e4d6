//! Incremental shop totals

use serde::{Deserialize, Serialize};

use crate::domain::{Product, Shop, ShopChanges};
use crate::{Result, ShoppingError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationType {
    Add,
    Remove,
    Receive,
}

impl CalculationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Receive => "receive",
        }
    }
}

/// Input to [`recalculate_shop_totals`]. `Add` reads the product's embedded
/// shop snapshot; `Remove` and `Receive` need the current shop in `shop`.
#[derive(Clone, Copy, Debug)]
pub struct TotalsRequest<'a> {
    pub product: &'a Product,
    pub calculation: CalculationType,
    pub shop: Option<&'a Shop>,
}

impl<'a> TotalsRequest<'a> {
    pub fn add(product: &'a Product) -> Self {
        Self { product, calculation: CalculationType::Add, shop: None }
    }

    pub fn remove(product: &'a Product, shop: &'a Shop) -> Self {
        Self { product, calculation: CalculationType::Remove, shop: Some(shop) }
    }

    pub fn receive(product: &'a Product, shop: &'a Shop) -> Self {
        Self { product, calculation: CalculationType::Receive, shop: Some(shop) }
    }
}

/// Computes the shop totals changed by one operation on `product`.
///
/// `Receive` is a toggle: the product moves to the opposite of its current
/// `received` flag. Moving away from received clamps the received count at 0
/// but does not clamp the received value, which may go negative.
pub fn recalculate_shop_totals(request: TotalsRequest<'_>) -> Result<ShopChanges> {
    let TotalsRequest { product, calculation, shop } = request;
    let shop = match calculation {
        CalculationType::Add => &product.shop,
        _ => shop.ok_or(ShoppingError::MissingTotalsSnapshot(calculation.as_str()))?,
    };
    let price = &product.price;
    let overflow = || ShoppingError::TotalsOverflow(shop.id.clone());
    let underflow = || ShoppingError::TotalsUnderflow(shop.id.clone());

    let changes = match calculation {
        CalculationType::Add => {
            let (received_products, received_value) = if product.received {
                (
                    shop.total_received_products.checked_add(1).ok_or_else(overflow)?,
                    shop.total_received_value.checked_plus(price).ok_or_else(overflow)?,
                )
            } else {
                (shop.total_received_products, shop.total_received_value.clone())
            };
            ShopChanges {
                total_value: Some(shop.total_value.checked_plus(price).ok_or_else(overflow)?),
                total_products: Some(shop.total_products.checked_add(1).ok_or_else(overflow)?),
                total_received_products: Some(received_products),
                total_received_value: Some(received_value),
            }
        }
        CalculationType::Remove => {
            let (received_products, received_value) = if product.received {
                (
                    shop.total_received_products.checked_sub(1).ok_or_else(underflow)?,
                    shop.total_received_value.checked_minus(price).ok_or_else(overflow)?,
                )
            } else {
                (shop.total_received_products, shop.total_received_value.clone())
            };
            ShopChanges {
                total_value: Some(shop.total_value.checked_minus(price).ok_or_else(overflow)?),
                total_products: Some(shop.total_products.checked_sub(1).ok_or_else(underflow)?),
                total_received_products: Some(received_products),
                total_received_value: Some(received_value),
            }
        }
        CalculationType::Receive => {
            let is_received = !product.received;
            let (received_products, received_value) = if is_received {
                (
                    shop.total_received_products.checked_add(1).ok_or_else(overflow)?,
                    shop.total_received_value.checked_plus(price).ok_or_else(overflow)?,
                )
            } else {
                (
                    shop.total_received_products.saturating_sub(1),
                    shop.total_received_value.checked_minus(price).ok_or_else(overflow)?,
                )
            };
            ShopChanges {
                total_received_products: Some(received_products),
                total_received_value: Some(received_value),
                ..Default::default()
            }
        }
    };

    Ok(changes)
}
