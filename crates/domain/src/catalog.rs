//! Catalog of purchasable items.

use async_trait::async_trait;
use common::{ItemId, Money};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A purchasable item as listed by the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub image: String,
}

impl CatalogItem {
    /// Creates a catalog item.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            description: description.into(),
            price,
            image: image.into(),
        }
    }
}

/// Source of the in-stock catalog (the listing endpoint).
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches every item with stock greater than zero.
    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, CatalogError>;
}

/// In-memory snapshot of the catalog, replaced wholesale on each load.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog from already-fetched items.
    pub fn from_items(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// Loads the catalog from `source`.
    ///
    /// On failure the previous snapshot is dropped so no partial or stale
    /// catalog is shown next to the error.
    #[tracing::instrument(skip_all)]
    pub async fn load<S: CatalogSource + ?Sized>(&mut self, source: &S) -> Result<(), CatalogError> {
        match source.fetch_catalog().await {
            Ok(items) => {
                tracing::debug!(count = items.len(), "catalog loaded");
                self.items = items;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "catalog load failed");
                self.items.clear();
                Err(err)
            }
        }
    }

    /// Returns all items in listing order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Looks up an item by ID.
    pub fn get(&self, id: ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns items whose name contains `term`, ignoring case.
    /// An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&CatalogItem> {
        let needle = term.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the catalog holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
