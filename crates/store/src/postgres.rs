use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{ItemId, Money, OrderId};
use domain::{CatalogItem, ShippingInfo};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    Result, StoreError,
    store::{NewOrder, OrderItemRecord, OrderRecord, PlacedOrder, ShopStore, reprice},
};

/// PostgreSQL-backed shop store.
#[derive(Clone)]
pub struct PostgresShopStore {
    pool: PgPool,
}

impl PostgresShopStore {
    /// Creates a new PostgreSQL shop store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_item(row: PgRow) -> Result<CatalogItem> {
        Ok(CatalogItem {
            id: ItemId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: Money::new(row.try_get::<Decimal, _>("price")?),
            image: row.try_get("image")?,
        })
    }

    fn row_to_order(row: PgRow) -> Result<OrderRecord> {
        Ok(OrderRecord {
            id: OrderId::new(row.try_get("id")?),
            customer: ShippingInfo {
                name: row.try_get("customer_name")?,
                email: row.try_get("email")?,
                address: row.try_get("address")?,
                city: row.try_get("city")?,
                zip_code: row.try_get("zip_code")?,
            },
            total: Money::new(row.try_get::<Decimal, _>("total")?),
            payment_method: row.try_get("payment_method")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        })
    }

    fn row_to_order_item(row: PgRow) -> Result<OrderItemRecord> {
        let quantity: i64 = row.try_get("quantity")?;
        Ok(OrderItemRecord {
            order_id: OrderId::new(row.try_get("order_id")?),
            item_id: ItemId::new(row.try_get("medicine_id")?),
            quantity: u32::try_from(quantity)
                .map_err(|_| StoreError::Fault(format!("stored quantity out of range: {quantity}")))?,
            price: Money::new(row.try_get::<Decimal, _>("price")?),
        })
    }
}

#[async_trait]
impl ShopStore for PostgresShopStore {
    #[tracing::instrument(skip(self))]
    async fn list_in_stock(&self) -> Result<Vec<CatalogItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, image
            FROM medicines
            WHERE stock > 0
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_item).collect()
    }

    #[tracing::instrument(skip(self, order), fields(lines = order.lines.len()))]
    async fn place_order(&self, order: NewOrder) -> Result<OrderId> {
        // Dropping `tx` on any early return rolls the whole order back.
        let mut tx = self.pool.begin().await?;

        // Lock every item row up front, in ID order, so concurrent orders
        // sharing items queue on the same first row instead of deadlocking.
        let ids: Vec<i64> = order
            .lines
            .iter()
            .map(|line| line.id.as_i64())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let locked: BTreeMap<i64, Decimal> = sqlx::query_as::<_, (i64, Decimal)>(
            "SELECT id, price FROM medicines WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(ids.as_slice())
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .collect();

        let prices = order
            .lines
            .iter()
            .map(|line| {
                locked
                    .get(&line.id.as_i64())
                    .map(|price| Money::new(*price))
                    .ok_or(StoreError::UnknownItem(line.id))
            })
            .collect::<Result<Vec<_>>>()?;
        let total = reprice(&order, &prices)?;

        let order_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (customer_name, email, address, city, zip_code, total, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&order.customer.name)
        .bind(&order.customer.email)
        .bind(&order.customer.address)
        .bind(&order.customer.city)
        .bind(&order.customer.zip_code)
        .bind(total.amount())
        .bind(&order.payment_method)
        .fetch_one(&mut *tx)
        .await?;

        for (line, price) in order.lines.iter().zip(&prices) {
            let quantity = i64::from(line.quantity);

            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, medicine_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(order_id)
            .bind(line.id.as_i64())
            .bind(quantity)
            .bind(price.amount())
            .execute(&mut *tx)
            .await?;

            let updated = sqlx::query(
                "UPDATE medicines SET stock = stock - $1 WHERE id = $2 AND stock >= $1",
            )
            .bind(quantity)
            .bind(line.id.as_i64())
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                let available: i64 = sqlx::query_scalar("SELECT stock FROM medicines WHERE id = $1")
                    .bind(line.id.as_i64())
                    .fetch_one(&mut *tx)
                    .await?;
                return Err(StoreError::InsufficientStock {
                    item_id: line.id,
                    requested: line.quantity,
                    available,
                });
            }
        }

        tx.commit().await?;
        Ok(OrderId::new(order_id))
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Option<PlacedOrder>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, customer_name, email, address, city, zip_code, total, payment_method, created_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let order = Self::row_to_order(row)?;

        let items = sqlx::query(
            r#"
            SELECT order_id, medicine_id, quantity, price
            FROM order_items
            WHERE order_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Self::row_to_order_item)
        .collect::<Result<Vec<_>>>()?;

        Ok(Some(PlacedOrder { order, items }))
    }

    async fn stock_level(&self, item_id: ItemId) -> Result<Option<i64>> {
        let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM medicines WHERE id = $1")
            .bind(item_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(stock)
    }
}
