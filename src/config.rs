//! Runtime configuration from the environment

use std::path::PathBuf;

use crate::assets::AssetSource;
use crate::{Result, ShoppingError};

const DEFAULT_PORT: u16 = 8083;
const DEFAULT_STORE_CAPACITY: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub assets: AssetSource,
    pub store_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { port: DEFAULT_PORT, assets: AssetSource::Bundled, store_capacity: DEFAULT_STORE_CAPACITY }
    }
}

impl Config {
    /// Reads `PORT`, `SHOPPING_ASSETS_DIR` and `SHOPPING_STORE_CAPACITY`.
    pub fn from_env() -> Result<Self> { Self::from_lookup(|key| std::env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(port) = lookup("PORT") {
            config.port = port.parse::<u16>().map_err(|_| ShoppingError::Config(format!("PORT must be a port number, got '{port}'")))?;
        }
        if let Some(dir) = lookup("SHOPPING_ASSETS_DIR").filter(|d| !d.is_empty()) {
            config.assets = AssetSource::Directory(PathBuf::from(dir));
        }
        if let Some(capacity) = lookup("SHOPPING_STORE_CAPACITY") {
            config.store_capacity = capacity
                .parse::<usize>()
                .ok()
                .filter(|c| *c > 0)
                .ok_or_else(|| ShoppingError::Config(format!("SHOPPING_STORE_CAPACITY must be a positive integer, got '{capacity}'")))?;
        }
        Ok(config)
    }

    pub fn bind_addr(&self) -> String { format!("0.0.0.0:{}", self.port) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:8083");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("SHOPPING_ASSETS_DIR", "/srv/assets"),
            ("SHOPPING_STORE_CAPACITY", "16"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.assets, AssetSource::Directory(PathBuf::from("/srv/assets")));
        assert_eq!(config.store_capacity, 16);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(Config::from_lookup(lookup(&[("PORT", "http")])), Err(ShoppingError::Config(_))));
        assert!(matches!(Config::from_lookup(lookup(&[("SHOPPING_STORE_CAPACITY", "0")])), Err(ShoppingError::Config(_))));
    }
}
