//! Client-side storefront engine.
//!
//! This crate holds the session logic of the MediShop storefront:
//! - Catalog snapshot with client-side search
//! - Cart engine keyed by item
//! - Checkout state machine gated on form validation and order submission
//! - Order request payload and the collaborator traits the client calls

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod order;

pub use cart::{Cart, CartLine};
pub use catalog::{Catalog, CatalogItem, CatalogSource};
pub use checkout::{Checkout, CheckoutStep};
pub use error::{CatalogError, CheckoutError, SubmissionError};
pub use order::{
    DEFAULT_PAYMENT_METHOD, OrderLine, OrderReceipt, OrderRequest, OrderSubmitter, PaymentDetails,
    PaymentField, ShippingField, ShippingInfo,
};
