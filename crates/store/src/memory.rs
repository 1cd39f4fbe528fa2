use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{ItemId, Money, OrderId};
use domain::CatalogItem;
use tokio::sync::RwLock;

use crate::{
    Result, StoreError,
    store::{NewOrder, OrderItemRecord, OrderRecord, PlacedOrder, ShopStore, reprice},
};

/// A point in the order transaction where the in-memory store can be told
/// to fail, for exercising rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPoint {
    /// Before the order header is inserted.
    BeforeOrderInsert,
    /// After the order header, before any order line.
    AfterOrderInsert,
    /// After the first order line and its stock decrement.
    AfterFirstLine,
}

#[derive(Debug, Clone)]
struct Medicine {
    item: CatalogItem,
    stock: i64,
}

#[derive(Debug, Clone, Default)]
struct ShopState {
    medicines: BTreeMap<ItemId, Medicine>,
    orders: Vec<OrderRecord>,
    order_items: Vec<OrderItemRecord>,
    last_order_id: i64,
}

/// In-memory shop store for tests and local runs.
///
/// Provides the same interface and transaction semantics as the
/// PostgreSQL implementation: an order is applied to a copy of the state
/// and swapped in only when every step succeeded.
#[derive(Clone, Default)]
pub struct InMemoryShopStore {
    state: Arc<RwLock<ShopState>>,
    fault: Arc<RwLock<Option<FaultPoint>>>,
}

impl InMemoryShopStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store stocked with a small demo catalog.
    pub async fn with_demo_catalog() -> Self {
        let store = Self::new();
        for (item, stock) in demo_catalog() {
            store.upsert_medicine(item, stock).await;
        }
        store
    }

    /// Inserts or replaces a catalog item and its stock.
    pub async fn upsert_medicine(&self, item: CatalogItem, stock: i64) {
        self.state
            .write()
            .await
            .medicines
            .insert(item.id, Medicine { item, stock });
    }

    /// Makes every following order fail at `point` until cleared.
    pub async fn set_fault(&self, point: Option<FaultPoint>) {
        *self.fault.write().await = point;
    }

    /// Returns the number of persisted orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns the number of persisted order lines.
    pub async fn order_item_count(&self) -> usize {
        self.state.read().await.order_items.len()
    }

    fn check_fault(active: Option<FaultPoint>, point: FaultPoint) -> Result<()> {
        if active == Some(point) {
            return Err(StoreError::Fault(format!("injected fault at {point:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ShopStore for InMemoryShopStore {
    async fn list_in_stock(&self) -> Result<Vec<CatalogItem>> {
        let state = self.state.read().await;
        Ok(state
            .medicines
            .values()
            .filter(|m| m.stock > 0)
            .map(|m| m.item.clone())
            .collect())
    }

    async fn place_order(&self, order: NewOrder) -> Result<OrderId> {
        let fault = *self.fault.read().await;
        let mut state = self.state.write().await;

        // Work on a copy; the live state is replaced only on commit.
        let mut tx = state.clone();

        let mut prices = Vec::with_capacity(order.lines.len());
        for line in &order.lines {
            let medicine = tx
                .medicines
                .get(&line.id)
                .ok_or(StoreError::UnknownItem(line.id))?;
            prices.push(medicine.item.price);
        }
        let total = reprice(&order, &prices)?;

        Self::check_fault(fault, FaultPoint::BeforeOrderInsert)?;
        tx.last_order_id += 1;
        let order_id = OrderId::new(tx.last_order_id);
        tx.orders.push(OrderRecord {
            id: order_id,
            customer: order.customer.clone(),
            total,
            payment_method: order.payment_method.clone(),
            created_at: Utc::now(),
        });
        Self::check_fault(fault, FaultPoint::AfterOrderInsert)?;

        for (index, (line, price)) in order.lines.iter().zip(prices).enumerate() {
            tx.order_items.push(OrderItemRecord {
                order_id,
                item_id: line.id,
                quantity: line.quantity,
                price,
            });

            let medicine = tx
                .medicines
                .get_mut(&line.id)
                .ok_or(StoreError::UnknownItem(line.id))?;
            let requested = i64::from(line.quantity);
            if medicine.stock < requested {
                return Err(StoreError::InsufficientStock {
                    item_id: line.id,
                    requested: line.quantity,
                    available: medicine.stock,
                });
            }
            medicine.stock -= requested;

            if index == 0 {
                Self::check_fault(fault, FaultPoint::AfterFirstLine)?;
            }
        }

        *state = tx;
        Ok(order_id)
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Option<PlacedOrder>> {
        let state = self.state.read().await;
        let Some(order) = state.orders.iter().find(|o| o.id == order_id) else {
            return Ok(None);
        };

        let items = state
            .order_items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect();

        Ok(Some(PlacedOrder {
            order: order.clone(),
            items,
        }))
    }

    async fn stock_level(&self, item_id: ItemId) -> Result<Option<i64>> {
        let state = self.state.read().await;
        Ok(state.medicines.get(&item_id).map(|m| m.stock))
    }
}

/// Demo catalog used when no database is configured.
pub fn demo_catalog() -> Vec<(CatalogItem, i64)> {
    vec![
        (
            CatalogItem::new(
                1,
                "Aspirin 75mg",
                "Low-dose aspirin, strip of 14 tablets",
                Money::from_paise(4500),
                "/images/aspirin.jpg",
            ),
            120,
        ),
        (
            CatalogItem::new(
                2,
                "Paracetamol 500mg",
                "Fever and pain relief, strip of 10 tablets",
                Money::from_paise(2999),
                "/images/paracetamol.jpg",
            ),
            200,
        ),
        (
            CatalogItem::new(
                3,
                "Cetirizine 10mg",
                "Antihistamine for allergy relief, strip of 10 tablets",
                Money::from_paise(3850),
                "/images/cetirizine.jpg",
            ),
            80,
        ),
        (
            CatalogItem::new(
                4,
                "Vitamin C 500mg",
                "Chewable tablets, bottle of 60",
                Money::from_paise(24900),
                "/images/vitamin-c.jpg",
            ),
            40,
        ),
        (
            CatalogItem::new(
                5,
                "ORS Sachet",
                "Oral rehydration salts, orange flavour",
                Money::from_paise(2100),
                "/images/ors.jpg",
            ),
            0,
        ),
    ]
}
