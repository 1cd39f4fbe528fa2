//! HTTP route handlers.

pub mod catalog;
pub mod health;
pub mod metrics;
pub mod orders;

use store::{OrderProcessor, ShopStore};

/// Shared application state accessible from all handlers.
pub struct AppState<S: ShopStore> {
    pub store: S,
    pub processor: OrderProcessor<S>,
}

impl<S: ShopStore + Clone> AppState<S> {
    /// Creates the state for `store`, with an order processor writing to it.
    pub fn new(store: S) -> Self {
        Self {
            processor: OrderProcessor::new(store.clone()),
            store,
        }
    }
}
