//! Checkout wizard: Cart → Shipping → Payment → Confirmation.

mod machine;
mod state;

pub use machine::Checkout;
pub use state::CheckoutStep;
