//! Catalog listing endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use domain::CatalogItem;
use store::ShopStore;

use super::AppState;
use crate::error::ApiError;

/// GET /api/medicines: lists every item currently in stock.
#[tracing::instrument(skip(state))]
pub async fn list<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<CatalogItem>>, ApiError> {
    metrics::counter!("catalog_requests_total").increment(1);

    let items = state.store.list_in_stock().await?;
    tracing::debug!(count = items.len(), "catalog listed");

    Ok(Json(items))
}
