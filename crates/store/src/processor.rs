//! Order transaction processor: validates a submitted order, then hands it
//! to the store for the all-or-nothing write.

use common::OrderId;
use domain::OrderRequest;
use thiserror::Error;

use crate::StoreError;
use crate::store::{NewOrder, ShopStore};

/// Why an order was not created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessorError {
    /// The payload is malformed or incomplete. Nothing was touched.
    #[error("{0}")]
    Rejected(String),

    /// The order does not fit the current catalog (unknown item, stale
    /// price, wrong total, not enough stock). The transaction was rolled
    /// back.
    #[error("{0}")]
    Conflict(String),

    /// A storage fault; the transaction was rolled back.
    #[error("{0}")]
    Failed(String),
}

impl ProcessorError {
    /// Returns the message shown to the customer.
    pub fn message(&self) -> &str {
        match self {
            ProcessorError::Rejected(msg)
            | ProcessorError::Conflict(msg)
            | ProcessorError::Failed(msg) => msg,
        }
    }
}

impl From<StoreError> for ProcessorError {
    fn from(err: StoreError) -> Self {
        if err.is_conflict() {
            ProcessorError::Conflict(err.to_string())
        } else {
            ProcessorError::Failed(err.to_string())
        }
    }
}

/// Validates and persists orders against a [`ShopStore`].
#[derive(Clone)]
pub struct OrderProcessor<S: ShopStore> {
    store: S,
}

impl<S: ShopStore> OrderProcessor<S> {
    /// Creates a processor writing to `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decodes a raw request body into an order request.
    ///
    /// The body must be a JSON object carrying `customer`, `items` and
    /// `total`; anything else is rejected before storage is touched.
    pub fn parse(body: &[u8]) -> Result<OrderRequest, ProcessorError> {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|_| ProcessorError::Rejected("Invalid JSON data".to_string()))?;

        let Some(object) = value.as_object().filter(|o| !o.is_empty()) else {
            return Err(ProcessorError::Rejected("Invalid JSON data".to_string()));
        };

        let present = |key: &str| object.get(key).is_some_and(|v| !v.is_null());
        if !(present("customer") && present("items") && present("total")) {
            return Err(ProcessorError::Rejected(
                "Missing required fields".to_string(),
            ));
        }

        serde_json::from_value(value)
            .map_err(|e| ProcessorError::Rejected(format!("Invalid order data: {e}")))
    }

    /// Parses `body` and creates the order it describes.
    pub async fn submit(&self, body: &[u8]) -> Result<OrderId, ProcessorError> {
        let request = Self::parse(body).inspect_err(|e| {
            metrics::counter!("orders_rejected_total").increment(1);
            tracing::info!(reason = %e, "order payload rejected");
        })?;
        self.create_order(request).await
    }

    /// Validates the order contents, then writes the order in one
    /// transaction.
    #[tracing::instrument(skip_all, fields(lines = request.items.len()))]
    pub async fn create_order(&self, request: OrderRequest) -> Result<OrderId, ProcessorError> {
        if let Err(e) = validate(&request) {
            metrics::counter!("orders_rejected_total").increment(1);
            tracing::info!(reason = %e, "order rejected");
            return Err(e);
        }

        let start = std::time::Instant::now();
        let result = self.store.place_order(NewOrder::from(request)).await;
        metrics::histogram!("order_duration_seconds").record(start.elapsed().as_secs_f64());

        match result {
            Ok(order_id) => {
                metrics::counter!("orders_placed_total").increment(1);
                tracing::info!(%order_id, "order placed");
                Ok(order_id)
            }
            Err(err) if err.is_conflict() => {
                metrics::counter!("orders_rejected_total").increment(1);
                tracing::info!(error = %err, "order conflicts with catalog");
                Err(err.into())
            }
            Err(err) => {
                metrics::counter!("orders_failed_total").increment(1);
                tracing::error!(error = %err, "order transaction rolled back");
                Err(err.into())
            }
        }
    }
}

fn validate(request: &OrderRequest) -> Result<(), ProcessorError> {
    if let Some(field) = request.customer.missing_field() {
        return Err(ProcessorError::Rejected(format!(
            "Missing customer field: {field}"
        )));
    }
    if request.items.is_empty() {
        return Err(ProcessorError::Rejected("Order has no items".to_string()));
    }
    if let Some(line) = request.items.iter().find(|line| line.quantity == 0) {
        return Err(ProcessorError::Rejected(format!(
            "Invalid quantity for item {}",
            line.id
        )));
    }
    if request.total.is_negative() {
        return Err(ProcessorError::Rejected("Invalid order total".to_string()));
    }
    Ok(())
}
