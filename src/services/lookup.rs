use crate::domain::Shop;

/// First shop whose id matches `shop_id` exactly (case-sensitive).
pub fn find_shop<'a>(shops: &'a [Shop], shop_id: &str) -> Option<&'a Shop> {
    shops.iter().find(|shop| shop.id == shop_id)
}
