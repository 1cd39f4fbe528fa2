//! Order creation endpoint.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use common::OrderId;
use serde::Serialize;
use store::ShopStore;

use super::AppState;
use crate::error::OrderFailure;

/// Success body of `POST /api/orders`.
#[derive(Debug, Serialize)]
pub struct OrderPlacedResponse {
    pub success: bool,
    pub order_id: OrderId,
    pub message: String,
}

/// POST /api/orders: validates the payload and writes the order in one
/// transaction.
///
/// The raw body is handed to the processor so malformed JSON gets the
/// same `{success, message}` shape as every other failure.
#[tracing::instrument(skip(state, body), fields(bytes = body.len()))]
pub async fn create<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<Json<OrderPlacedResponse>, OrderFailure> {
    let order_id = state.processor.submit(&body).await?;

    Ok(Json(OrderPlacedResponse {
        success: true,
        order_id,
        message: "Order placed successfully".to_string(),
    }))
}
