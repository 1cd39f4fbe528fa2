//! Shop persistence and the order transaction processor.
//!
//! [`ShopStore`] is implemented for PostgreSQL and in memory. Both write an
//! order (header, lines, stock decrements) as one all-or-nothing unit.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod processor;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::{FaultPoint, InMemoryShopStore, demo_catalog};
pub use postgres::PostgresShopStore;
pub use processor::{OrderProcessor, ProcessorError};
pub use store::{NewOrder, OrderItemRecord, OrderRecord, PlacedOrder, ShopStore};
