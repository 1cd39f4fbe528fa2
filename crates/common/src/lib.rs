//! Shared value types used by every MediShop crate.

mod money;
mod types;

pub use money::Money;
pub use types::{ItemId, OrderId};
