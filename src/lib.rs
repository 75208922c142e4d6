//! Shopping List
//!
//! Track products across shops, their delivery dates and whether they have
//! arrived, with running totals kept per shop.
//!
//! ## Features
//! - Add-product workflow with form validation
//! - Incremental per-shop totals (add, remove, receive toggle)
//! - Serialized in-memory store fed by typed events
//! - Bundled or on-disk initial shop/product data

pub mod api;
pub mod assets;
pub mod config;
pub mod domain;
pub mod services;
pub mod store;
pub mod workflow;

use thiserror::Error;

use crate::workflow::FieldViolation;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShoppingError {
    #[error("Shop not found: {0}")]
    ShopNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Missing shop totals snapshot for {0} calculation")]
    MissingTotalsSnapshot(&'static str),

    #[error("Shop totals underflow on {0}")]
    TotalsUnderflow(String),

    #[error("Shop totals overflow on {0}")]
    TotalsOverflow(String),

    #[error("Invalid product form: {}", format_violations(.0))]
    InvalidForm(Vec<FieldViolation>),

    #[error("Form is disabled until reset")]
    FormDisabled,

    #[error("Store closed")]
    StoreClosed,

    #[error("Asset error: {0}")]
    Asset(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

pub type Result<T> = std::result::Result<T, ShoppingError>;
