//! Checkout steps.

use serde::{Deserialize, Serialize};

/// The step the checkout wizard is on.
///
/// Step transitions:
/// ```text
/// Cart ──► Shipping ──► Payment ──► Confirmation
///  ▲          │  ▲         │             │
///  └──────────┘  └─────────┘             │
///  ▲                                     │
///  └─────────────── close ───────────────┘
/// ```
/// Forward moves are gated; back moves go one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutStep {
    /// Reviewing cart contents.
    #[default]
    Cart,

    /// Entering shipping details.
    Shipping,

    /// Entering payment details and submitting the order.
    Payment,

    /// Order accepted.
    Confirmation,
}

impl CheckoutStep {
    /// Returns true if checkout can start from this step.
    pub fn can_proceed_to_shipping(&self) -> bool {
        matches!(self, CheckoutStep::Cart)
    }

    /// Returns true if shipping details can be submitted in this step.
    pub fn can_submit_shipping(&self) -> bool {
        matches!(self, CheckoutStep::Shipping)
    }

    /// Returns true if the order can be submitted in this step.
    pub fn can_submit_payment(&self) -> bool {
        matches!(self, CheckoutStep::Payment)
    }

    /// Returns the step a back action leads to, if any.
    pub fn previous(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Shipping => Some(CheckoutStep::Cart),
            CheckoutStep::Payment => Some(CheckoutStep::Shipping),
            CheckoutStep::Cart | CheckoutStep::Confirmation => None,
        }
    }

    /// Returns true once the order has been accepted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutStep::Confirmation)
    }

    /// Returns the step name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "cart",
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Confirmation => "confirmation",
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
