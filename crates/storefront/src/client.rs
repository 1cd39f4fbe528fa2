//! HTTP client for the MediShop API.

use async_trait::async_trait;
use common::OrderId;
use domain::{
    CatalogError, CatalogItem, CatalogSource, OrderReceipt, OrderRequest, OrderSubmitter,
    SubmissionError,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Shown when a failed order response carries no message of its own.
const ORDER_FAILED_FALLBACK: &str = "Order could not be placed. Please try again.";

/// Shown when a failed catalog response carries no message of its own.
const CATALOG_FAILED_FALLBACK: &str = "Failed to load medicines";

/// Body of `POST /orders`, on success and failure alike.
#[derive(Debug, Deserialize)]
struct OrderResponse {
    success: bool,
    order_id: Option<OrderId>,
    message: Option<String>,
}

/// Failure body of `GET /medicines`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// MediShop API client.
#[derive(Debug, Clone)]
pub struct ShopClient {
    client: Client,
    base_url: String,
}

impl ShopClient {
    /// Creates a client for the API at `config.api_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists the medicines currently in stock.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the server reports a failure, or
    /// the body is not a medicine list.
    #[instrument(skip(self))]
    pub async fn list_medicines(&self) -> Result<Vec<CatalogItem>, ClientError> {
        let response = self
            .client
            .get(format!("{}/medicines", self.base_url))
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Response(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| CATALOG_FAILED_FALLBACK.to_string());
            warn!(status = status.as_u16(), %message, "catalog request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let items: Vec<CatalogItem> =
            serde_json::from_slice(&body).map_err(|e| ClientError::Response(e.to_string()))?;
        debug!(count = items.len(), "catalog loaded");

        Ok(items)
    }

    /// Submits one order. Never retried.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server does not confirm
    /// the order. A server-provided message is kept verbatim.
    #[instrument(skip(self, request), fields(lines = request.items.len()))]
    pub async fn create_order(&self, request: &OrderRequest) -> Result<OrderReceipt, ClientError> {
        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Response(e.to_string()))?;

        let decoded = serde_json::from_slice::<OrderResponse>(&body);
        let receipt = match decoded {
            Ok(OrderResponse {
                success: true,
                order_id: Some(order_id),
                message,
            }) if status.is_success() => OrderReceipt {
                order_id,
                message: message.unwrap_or_default(),
            },
            Ok(OrderResponse {
                success: true,
                order_id: None,
                ..
            }) if status.is_success() => {
                return Err(ClientError::Response(
                    "order confirmed without an order id".to_string(),
                ));
            }
            Ok(failure) => return Err(order_failure(status, failure.message)),
            Err(_) if !status.is_success() => return Err(order_failure(status, None)),
            Err(e) => return Err(ClientError::Response(e.to_string())),
        };

        debug!(order_id = %receipt.order_id, "order accepted");
        Ok(receipt)
    }
}

fn order_failure(status: StatusCode, message: Option<String>) -> ClientError {
    let message = message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| ORDER_FAILED_FALLBACK.to_string());
    warn!(status = status.as_u16(), %message, "order rejected");
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl CatalogSource for ShopClient {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        Ok(self.list_medicines().await?)
    }
}

#[async_trait]
impl OrderSubmitter for ShopClient {
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderReceipt, SubmissionError> {
        Ok(self.create_order(request).await?)
    }
}
