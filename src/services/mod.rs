//! Pure domain services
pub mod lookup;
pub mod totals;

pub use lookup::find_shop;
pub use totals::{recalculate_shop_totals, CalculationType, TotalsRequest};
