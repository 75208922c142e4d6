//! Authoritative shop/product collections and the event reducer

use tracing::{debug, warn};

use crate::domain::{Product, ProductId, Shop, ShoppingEvent};
use crate::services::{find_shop, recalculate_shop_totals, TotalsRequest};
use crate::workflow::{Submission, ValidProductForm};
use crate::{Result, ShoppingError};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShoppingState {
    shops: Vec<Shop>,
    products: Vec<Product>,
}

impl ShoppingState {
    pub fn new(shops: Vec<Shop>, products: Vec<Product>) -> Self { Self { shops, products } }

    pub fn shops(&self) -> &[Shop] { &self.shops }
    pub fn products(&self) -> &[Product] { &self.products }
    pub fn shop(&self, id: &str) -> Option<&Shop> { find_shop(&self.shops, id) }
    pub fn product(&self, id: &ProductId) -> Option<&Product> { self.products.iter().find(|p| &p.id == id) }

    pub fn products_for_shop<'a>(&'a self, shop_id: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| p.shop_id() == shop_id)
    }

    /// Shops whose stored totals disagree with a recount over their products,
    /// paired with the recount.
    pub fn drifted_shops(&self) -> Vec<(&Shop, Shop)> {
        self.shops
            .iter()
            .map(|shop| (shop, Shop::tally(shop.id.clone(), &self.products)))
            .filter(|(shop, tallied)| !shop.totals_match(tallied))
            .collect()
    }

    pub fn apply(&mut self, event: ShoppingEvent) {
        match event {
            ShoppingEvent::ProductAdded { product } => {
                if self.product(&product.id).is_some() {
                    debug!(product_id = %product.id, "product already present, ignoring add");
                } else {
                    self.products.push(product);
                }
            }
            ShoppingEvent::ShopUpdated { id, changes } => match self.shops.iter_mut().find(|s| s.id == id) {
                Some(shop) => shop.apply(&changes),
                None => warn!(shop_id = %id, "update for unknown shop dropped"),
            },
            ShoppingEvent::ProductRemoved { id } => {
                let before = self.products.len();
                self.products.retain(|p| p.id != id);
                if self.products.len() == before {
                    warn!(product_id = %id, "remove for unknown product dropped");
                }
            }
            ShoppingEvent::ProductUpdated { id, received } => match self.products.iter_mut().find(|p| p.id == id) {
                Some(product) => product.received = received,
                None => warn!(product_id = %id, "update for unknown product dropped"),
            },
        }
    }

    /// Creates the product against the authoritative shop record and returns
    /// it with the `ProductAdded` / `ShopUpdated` events that record it.
    pub fn plan_add(&self, input: ValidProductForm) -> Result<(Submission, Vec<ShoppingEvent>)> {
        let shop = self.shop(&input.shop_id).ok_or_else(|| ShoppingError::ShopNotFound(input.shop_id.clone()))?;
        let product = Product::create(input.name, input.price, input.delivery_est_date, shop);
        let changes = recalculate_shop_totals(TotalsRequest::add(&product))?;
        let shop = product.shop.with_changes(&changes);
        let events = vec![
            ShoppingEvent::ProductAdded { product: product.clone() },
            ShoppingEvent::ShopUpdated { id: shop.id.clone(), changes: changes.clone() },
        ];
        Ok((Submission { product, shop, changes }, events))
    }

    /// Events that remove a product and take it out of its shop's totals.
    pub fn plan_remove(&self, id: &ProductId) -> Result<Vec<ShoppingEvent>> {
        let (product, shop) = self.product_with_shop(id)?;
        let changes = recalculate_shop_totals(TotalsRequest::remove(product, shop))?;
        Ok(vec![
            ShoppingEvent::ProductRemoved { id: product.id.clone() },
            ShoppingEvent::ShopUpdated { id: shop.id.clone(), changes },
        ])
    }

    /// Events that flip a product's received flag and adjust its shop's
    /// received totals.
    pub fn plan_toggle_received(&self, id: &ProductId) -> Result<Vec<ShoppingEvent>> {
        let (product, shop) = self.product_with_shop(id)?;
        let changes = recalculate_shop_totals(TotalsRequest::receive(product, shop))?;
        Ok(vec![
            ShoppingEvent::ProductUpdated { id: product.id.clone(), received: !product.received },
            ShoppingEvent::ShopUpdated { id: shop.id.clone(), changes },
        ])
    }

    fn product_with_shop(&self, id: &ProductId) -> Result<(&Product, &Shop)> {
        let product = self.product(id).ok_or_else(|| ShoppingError::ProductNotFound(id.to_string()))?;
        let shop = self.shop(product.shop_id()).ok_or_else(|| ShoppingError::ShopNotFound(product.shop_id().to_string()))?;
        Ok((product, shop))
    }
}
