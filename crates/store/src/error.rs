use common::{ItemId, Money};
use thiserror::Error;

/// Errors that can occur when reading or writing the shop database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An order line refers to an item that is not in the catalog.
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// Not enough stock left to cover an order line.
    #[error("Insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: ItemId,
        requested: u32,
        available: i64,
    },

    /// A submitted line price differs from the catalog price.
    #[error("Price changed for item {item_id}: submitted {submitted}, current {current}")]
    PriceMismatch {
        item_id: ItemId,
        submitted: Money,
        current: Money,
    },

    /// The submitted total differs from the total of the re-priced lines.
    #[error("Order total mismatch: submitted {submitted}, computed {computed}")]
    TotalMismatch { submitted: Money, computed: Money },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A storage fault outside the database driver.
    #[error("Storage fault: {0}")]
    Fault(String),
}

impl StoreError {
    /// Returns true if the order conflicts with the current catalog state,
    /// as opposed to a storage failure.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::UnknownItem(_)
                | StoreError::InsufficientStock { .. }
                | StoreError::PriceMismatch { .. }
                | StoreError::TotalMismatch { .. }
        )
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
