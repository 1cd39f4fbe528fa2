//! MediShop storefront client.
//!
//! Talks to the API server over HTTP and drives a shopping session:
//! catalog loading and search, the cart, and the checkout flow ending in
//! one order submission.

pub mod client;
pub mod config;
pub mod error;
pub mod session;

pub use client::ShopClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use session::Storefront;
