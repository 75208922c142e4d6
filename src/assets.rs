//! Initial shop/product data, bundled or read from a directory

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::domain::{Product, Shop};
use crate::store::ShoppingState;
use crate::{Result, ShoppingError};

const SHOPS_FILE: &str = "shops.json";
const PRODUCTS_FILE: &str = "products.json";
const BUNDLED_SHOPS: &str = include_str!("../assets/shops.json");
const BUNDLED_PRODUCTS: &str = include_str!("../assets/products.json");

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AssetSource {
    #[default]
    Bundled,
    Directory(PathBuf),
}

#[derive(Clone, Debug, PartialEq)]
pub struct InitialData {
    pub shops: Vec<Shop>,
    pub products: Vec<Product>,
}

impl InitialData {
    pub async fn load(source: &AssetSource) -> Result<Self> {
        let data = match source {
            AssetSource::Bundled => Self {
                shops: parse(SHOPS_FILE, BUNDLED_SHOPS)?,
                products: parse(PRODUCTS_FILE, BUNDLED_PRODUCTS)?,
            },
            AssetSource::Directory(dir) => {
                let (shops, products) = tokio::try_join!(read(dir, SHOPS_FILE), read(dir, PRODUCTS_FILE))?;
                Self { shops: parse(SHOPS_FILE, &shops)?, products: parse(PRODUCTS_FILE, &products)? }
            }
        };
        info!(?source, shops = data.shops.len(), products = data.products.len(), "initial data loaded");
        Ok(data)
    }

    /// Builds the store state, logging any shop whose totals disagree with
    /// its products. Stored totals are kept as loaded.
    pub fn into_state(self) -> ShoppingState {
        let state = ShoppingState::new(self.shops, self.products);
        for (shop, tallied) in state.drifted_shops() {
            warn!(
                shop_id = %shop.id,
                stored_products = shop.total_products,
                counted_products = tallied.total_products,
                stored_value = %shop.total_value,
                counted_value = %tallied.total_value,
                "shop totals disagree with products"
            );
        }
        state
    }
}

async fn read(dir: &Path, file: &str) -> Result<String> {
    let path = dir.join(file);
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| ShoppingError::Asset(format!("{}: {e}", path.display())))
}

fn parse<T: DeserializeOwned>(file: &str, raw: &str) -> Result<Vec<T>> {
    serde_json::from_str(raw).map_err(|e| ShoppingError::Asset(format!("{file}: {e}")))
}
