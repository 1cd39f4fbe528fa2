//! The order-creation wire payload and the collaborator that submits it.

use async_trait::async_trait;
use common::{ItemId, Money, OrderId};
use serde::{Deserialize, Serialize};

use super::ShippingInfo;
use crate::cart::Cart;
use crate::error::SubmissionError;

/// Payment method recorded when the request does not name one.
pub const DEFAULT_PAYMENT_METHOD: &str = "card";

/// One cart line as submitted: item, quantity, and the price the client
/// saw when the item was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: ItemId,
    pub quantity: u32,
    pub price: Money,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer: ShippingInfo,
    pub items: Vec<OrderLine>,
    pub total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl OrderRequest {
    /// Builds a request from the cart contents. The total is the cart total.
    pub fn from_cart(
        customer: ShippingInfo,
        cart: &Cart,
        payment_method: impl Into<String>,
    ) -> Self {
        let items = cart
            .lines()
            .iter()
            .map(|line| OrderLine {
                id: line.item.id,
                quantity: line.quantity,
                price: line.item.price,
            })
            .collect();

        Self {
            customer,
            items,
            total: cart.total(),
            payment_method: Some(payment_method.into()),
        }
    }

    /// Returns the payment method, falling back to [`DEFAULT_PAYMENT_METHOD`].
    pub fn payment_method(&self) -> &str {
        self.payment_method
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_PAYMENT_METHOD)
    }
}

/// What the processor hands back for an accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub message: String,
}

/// Sends an order to the order transaction processor.
///
/// One call is one attempt; implementations do not retry.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderReceipt, SubmissionError>;
}
