use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{ItemId, Money, OrderId};
use domain::{CatalogItem, OrderLine, OrderRequest, ShippingInfo};
use serde::{Deserialize, Serialize};

use crate::{Result, StoreError};

/// A validated order, ready to be written in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer: ShippingInfo,
    pub lines: Vec<OrderLine>,
    pub total: Money,
    pub payment_method: String,
}

impl From<OrderRequest> for NewOrder {
    fn from(request: OrderRequest) -> Self {
        let payment_method = request.payment_method().to_string();
        Self {
            customer: request.customer,
            lines: request.items,
            total: request.total,
            payment_method,
        }
    }
}

/// A persisted order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer: ShippingInfo,
    pub total: Money,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted order line, priced at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemRecord {
    pub order_id: OrderId,
    pub item_id: ItemId,
    pub quantity: u32,
    pub price: Money,
}

/// An order header together with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order: OrderRecord,
    pub items: Vec<OrderItemRecord>,
}

/// Core trait for shop storage backends.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Lists every catalog item with stock greater than zero, by ID.
    async fn list_in_stock(&self) -> Result<Vec<CatalogItem>>;

    /// Writes an order atomically.
    ///
    /// Inside one transaction: each line is re-priced from the catalog,
    /// the total is checked, the order header and its lines are inserted,
    /// and stock is decremented only where enough remains. Either all of
    /// it is persisted or none of it is.
    async fn place_order(&self, order: NewOrder) -> Result<OrderId>;

    /// Loads an order and its lines.
    ///
    /// Returns None if no such order exists.
    async fn get_order(&self, order_id: OrderId) -> Result<Option<PlacedOrder>>;

    /// Returns the current stock counter of an item.
    ///
    /// Returns None if the item does not exist.
    async fn stock_level(&self, item_id: ItemId) -> Result<Option<i64>>;
}

/// Compares submitted prices against catalog prices and returns the
/// recomputed total.
///
/// `catalog_prices` holds the authoritative price of each line, in line
/// order.
pub fn reprice(order: &NewOrder, catalog_prices: &[Money]) -> Result<Money> {
    let mut computed = Money::zero();
    for (line, current) in order.lines.iter().zip(catalog_prices) {
        if line.price.round() != current.round() {
            return Err(StoreError::PriceMismatch {
                item_id: line.id,
                submitted: line.price,
                current: *current,
            });
        }
        computed += current.multiply(line.quantity);
    }

    if order.total.round() != computed.round() {
        return Err(StoreError::TotalMismatch {
            submitted: order.total,
            computed,
        });
    }

    Ok(computed)
}
