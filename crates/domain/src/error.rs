//! Domain error types.

use thiserror::Error;

use crate::checkout::CheckoutStep;
use crate::order::{PaymentField, ShippingField};

/// The catalog could not be fetched.
///
/// Blocking: the view shows the message instead of a partial catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Transport or query failure, with a diagnostic message.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// An order submission did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The processor refused or failed the order. The message is shown
    /// to the user verbatim.
    #[error("{0}")]
    Failed(String),
}

impl SubmissionError {
    /// Returns the user-facing message.
    pub fn message(&self) -> &str {
        match self {
            SubmissionError::Failed(msg) => msg,
        }
    }
}

/// A checkout transition was refused. The machine stays where it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// The action is not available from the current step.
    #[error("Cannot {action} from the {current} step")]
    InvalidTransition {
        current: CheckoutStep,
        action: &'static str,
    },

    /// Checkout cannot start with an empty cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A required shipping field is blank.
    #[error("Shipping field '{0}' is required")]
    MissingShippingField(ShippingField),

    /// A required payment field is blank.
    #[error("Payment field '{0}' is required")]
    MissingPaymentField(PaymentField),

    /// The order processor did not accept the order.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
