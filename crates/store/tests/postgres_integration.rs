//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use common::{ItemId, Money};
use domain::{OrderLine, ShippingInfo};
use sqlx::PgPool;
use store::{NewOrder, OrderProcessor, PostgresShopStore, ProcessorError, ShopStore, StoreError};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresShopStore::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool, emptied tables and a known catalog:
/// Aspirin (id 1, ₹5.00, stock 10), Cough Syrup (id 2, ₹12.00, stock 1),
/// Insulin Pen (id 3, ₹450.00, stock 0).
async fn get_test_store() -> PostgresShopStore {
    let info = get_container_info().await;

    // Create a fresh pool for each test to avoid connection issues
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    // Clear tables for test isolation
    sqlx::query("TRUNCATE TABLE order_items, orders, medicines RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .unwrap();

    sqlx::query(
        r#"
        INSERT INTO medicines (id, name, description, price, image, stock) VALUES
            (1, 'Aspirin', 'Pain relief', 5.00, 'aspirin.jpg', 10),
            (2, 'Cough Syrup', 'Dry cough', 12.00, 'syrup.jpg', 1),
            (3, 'Insulin Pen', 'Cold chain', 450.00, 'insulin.jpg', 0)
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    PostgresShopStore::new(pool)
}

fn new_order(lines: &[(i64, u32, i64)]) -> NewOrder {
    let lines: Vec<OrderLine> = lines
        .iter()
        .map(|&(id, quantity, paise)| OrderLine {
            id: ItemId::new(id),
            quantity,
            price: Money::from_paise(paise),
        })
        .collect();
    let total = lines.iter().map(|l| l.price.multiply(l.quantity)).sum();

    NewOrder {
        customer: ShippingInfo::new(
            "Kiran Das",
            "kiran@example.com",
            "9 Park Street",
            "Kolkata",
            "700016",
        ),
        lines,
        total,
        payment_method: "card".to_string(),
    }
}

async fn row_count(store: &PostgresShopStore, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(store.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn lists_in_stock_items_only() {
    let store = get_test_store().await;

    let items = store.list_in_stock().await.unwrap();

    let ids: Vec<_> = items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![ItemId::new(1), ItemId::new(2)]);
    assert_eq!(items[0].name, "Aspirin");
    assert_eq!(items[0].price, Money::from_paise(500));
}

#[tokio::test]
async fn place_order_writes_header_lines_and_stock() {
    let store = get_test_store().await;

    let order_id = store.place_order(new_order(&[(1, 2, 500)])).await.unwrap();

    let placed = store.get_order(order_id).await.unwrap().unwrap();
    assert_eq!(placed.order.customer.city, "Kolkata");
    assert_eq!(placed.order.total, Money::from_paise(1000));
    assert_eq!(placed.order.payment_method, "card");
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].item_id, ItemId::new(1));
    assert_eq!(placed.items[0].quantity, 2);
    assert_eq!(placed.items[0].price, Money::from_paise(500));

    assert_eq!(store.stock_level(ItemId::new(1)).await.unwrap(), Some(8));
}

#[tokio::test]
async fn failure_after_header_rolls_back_everything() {
    let store = get_test_store().await;

    // The first line succeeds, the second runs out of stock after the
    // header and first line are already written.
    let err = store
        .place_order(new_order(&[(1, 3, 500), (2, 2, 1200)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::InsufficientStock { available: 1, .. }
    ));
    assert_eq!(row_count(&store, "orders").await, 0);
    assert_eq!(row_count(&store, "order_items").await, 0);
    assert_eq!(store.stock_level(ItemId::new(1)).await.unwrap(), Some(10));
    assert_eq!(store.stock_level(ItemId::new(2)).await.unwrap(), Some(1));
}

#[tokio::test]
async fn out_of_stock_item_cannot_be_ordered() {
    let store = get_test_store().await;

    let err = store
        .place_order(new_order(&[(3, 1, 45000)]))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::InsufficientStock { .. }));
    assert_eq!(store.stock_level(ItemId::new(3)).await.unwrap(), Some(0));
}

#[tokio::test]
async fn stale_client_price_is_rejected() {
    let store = get_test_store().await;

    let err = store
        .place_order(new_order(&[(1, 1, 100)]))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::PriceMismatch { .. }));
    assert_eq!(row_count(&store, "orders").await, 0);
}

#[tokio::test]
async fn unknown_item_is_rejected() {
    let store = get_test_store().await;

    let err = store
        .place_order(new_order(&[(42, 1, 500)]))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::UnknownItem(_)));
}

#[tokio::test]
async fn concurrent_orders_cannot_oversell() {
    let store = get_test_store().await;
    sqlx::query("UPDATE medicines SET stock = 3 WHERE id = 1")
        .execute(store.pool())
        .await
        .unwrap();

    let a = store.clone();
    let b = store.clone();
    let (first, second) = tokio::join!(
        a.place_order(new_order(&[(1, 2, 500)])),
        b.place_order(new_order(&[(1, 2, 500)])),
    );

    assert_eq!(
        [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(),
        1
    );
    assert_eq!(store.stock_level(ItemId::new(1)).await.unwrap(), Some(1));
    assert_eq!(row_count(&store, "orders").await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_orders_listing_shared_items_in_opposite_order_both_succeed() {
    let store = get_test_store().await;
    sqlx::query("UPDATE medicines SET stock = 1000 WHERE id IN (1, 2)")
        .execute(store.pool())
        .await
        .unwrap();

    let rounds = 25;
    for _ in 0..rounds {
        let forward = tokio::spawn({
            let store = store.clone();
            async move {
                store
                    .place_order(new_order(&[(1, 1, 500), (2, 2, 1200)]))
                    .await
            }
        });
        let reverse = tokio::spawn({
            let store = store.clone();
            async move {
                store
                    .place_order(new_order(&[(2, 1, 1200), (1, 3, 500)]))
                    .await
            }
        });

        let (forward, reverse) = tokio::join!(forward, reverse);
        forward.unwrap().unwrap();
        reverse.unwrap().unwrap();
    }

    // Each round takes 1 + 3 of item 1 and 2 + 1 of item 2
    assert_eq!(
        store.stock_level(ItemId::new(1)).await.unwrap(),
        Some(1000 - 4 * rounds)
    );
    assert_eq!(
        store.stock_level(ItemId::new(2)).await.unwrap(),
        Some(1000 - 3 * rounds)
    );
    assert_eq!(row_count(&store, "orders").await, 2 * rounds);
    assert_eq!(row_count(&store, "order_items").await, 4 * rounds);
}

#[tokio::test]
async fn order_repeating_an_item_is_priced_per_line() {
    let store = get_test_store().await;

    let order_id = store
        .place_order(new_order(&[(1, 2, 500), (1, 1, 500)]))
        .await
        .unwrap();

    let placed = store.get_order(order_id).await.unwrap().unwrap();
    assert_eq!(placed.order.total, Money::from_paise(1500));
    assert_eq!(placed.items.len(), 2);
    assert_eq!(store.stock_level(ItemId::new(1)).await.unwrap(), Some(7));
}

#[tokio::test]
async fn processor_submits_raw_payload() {
    let store = get_test_store().await;
    let processor = OrderProcessor::new(store.clone());

    let body = serde_json::to_vec(&serde_json::json!({
        "customer": {
            "name": "Kiran Das",
            "email": "kiran@example.com",
            "address": "9 Park Street",
            "city": "Kolkata",
            "zipCode": "700016"
        },
        "items": [{"id": 1, "quantity": 2, "price": 5.0}],
        "total": 10.0
    }))
    .unwrap();

    let order_id = processor.submit(&body).await.unwrap();

    let placed = store.get_order(order_id).await.unwrap().unwrap();
    assert_eq!(placed.order.payment_method, "card");
    assert_eq!(store.stock_level(ItemId::new(1)).await.unwrap(), Some(8));
}

#[tokio::test]
async fn processor_rejects_missing_items_without_writing() {
    let store = get_test_store().await;
    let processor = OrderProcessor::new(store.clone());

    let body = br#"{"customer": {"name": "x"}, "total": 10.0}"#;
    let err = processor.submit(body).await.unwrap_err();

    assert_eq!(
        err,
        ProcessorError::Rejected("Missing required fields".to_string())
    );
    assert_eq!(row_count(&store, "orders").await, 0);
}
