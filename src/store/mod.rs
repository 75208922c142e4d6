//! In-memory shopping store fed by typed events
mod actor;
mod state;

pub use actor::{Response, ShopsSubscription, ShoppingStore, StoreCommand, StoreHandle};
pub use state::ShoppingState;
