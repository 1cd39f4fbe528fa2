//! Guarded checkout transitions.

use crate::cart::Cart;
use crate::error::CheckoutError;
use crate::order::{
    DEFAULT_PAYMENT_METHOD, OrderReceipt, OrderRequest, OrderSubmitter, PaymentDetails,
    ShippingInfo,
};

use super::CheckoutStep;

/// The checkout wizard for one session.
///
/// Every forward transition checks the exit condition of the current step
/// and leaves the machine untouched when it is not met.
#[derive(Debug, Clone)]
pub struct Checkout {
    step: CheckoutStep,
    shipping: ShippingInfo,
    payment_method: String,
    receipt: Option<OrderReceipt>,
    notice: Option<String>,
}

impl Default for Checkout {
    fn default() -> Self {
        Self {
            step: CheckoutStep::Cart,
            shipping: ShippingInfo::default(),
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
            receipt: None,
            notice: None,
        }
    }
}

impl Checkout {
    /// Creates a machine on the Cart step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current step.
    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Returns the shipping details accepted on the Shipping step.
    pub fn shipping(&self) -> &ShippingInfo {
        &self.shipping
    }

    /// Returns the receipt of the accepted order while on Confirmation.
    pub fn receipt(&self) -> Option<&OrderReceipt> {
        self.receipt.as_ref()
    }

    /// Returns the last submission failure message, if not dismissed.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Clears the failure notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Cart → Shipping. Refused when the cart is empty.
    pub fn proceed_to_shipping(&mut self, cart: &Cart) -> Result<CheckoutStep, CheckoutError> {
        self.ensure(self.step.can_proceed_to_shipping(), "proceed to shipping")?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.step = CheckoutStep::Shipping;
        Ok(self.step)
    }

    /// Shipping → Payment. Refused while any shipping field is blank.
    pub fn submit_shipping(&mut self, info: ShippingInfo) -> Result<CheckoutStep, CheckoutError> {
        self.ensure(self.step.can_submit_shipping(), "submit shipping details")?;
        if let Some(field) = info.missing_field() {
            return Err(CheckoutError::MissingShippingField(field));
        }

        self.shipping = info;
        self.step = CheckoutStep::Payment;
        Ok(self.step)
    }

    /// Payment → Confirmation.
    ///
    /// Checks the payment fields, then submits the cart once through
    /// `submitter`. On failure the machine stays on Payment, the message is
    /// kept as a notice, and the cart is left as it was so the user can
    /// resubmit.
    #[tracing::instrument(skip_all, fields(step = %self.step))]
    pub async fn submit_payment<S: OrderSubmitter + ?Sized>(
        &mut self,
        payment: &PaymentDetails,
        cart: &Cart,
        submitter: &S,
    ) -> Result<OrderReceipt, CheckoutError> {
        self.ensure(self.step.can_submit_payment(), "submit payment")?;
        if let Some(field) = payment.missing_field() {
            return Err(CheckoutError::MissingPaymentField(field));
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let request = OrderRequest::from_cart(self.shipping.clone(), cart, &*self.payment_method);

        match submitter.submit_order(&request).await {
            Ok(receipt) => {
                tracing::info!(order_id = %receipt.order_id, "order confirmed");
                self.step = CheckoutStep::Confirmation;
                self.receipt = Some(receipt.clone());
                self.notice = None;
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(error = %err, "order submission failed");
                self.notice = Some(err.message().to_string());
                Err(err.into())
            }
        }
    }

    /// Steps back once: Shipping → Cart, Payment → Shipping. No-op elsewhere.
    pub fn back(&mut self) -> CheckoutStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Returns to Cart from Shipping or Payment without touching the cart.
    /// A confirmed checkout must be closed with [`Checkout::close`].
    pub fn reset(&mut self) -> CheckoutStep {
        if !self.step.is_terminal() {
            self.step = CheckoutStep::Cart;
            self.notice = None;
        }
        self.step
    }

    /// Confirmation → Cart. Empties the cart and forgets the checkout.
    pub fn close(&mut self, cart: &mut Cart) -> Result<CheckoutStep, CheckoutError> {
        self.ensure(self.step.is_terminal(), "close checkout")?;

        cart.clear();
        *self = Self {
            payment_method: std::mem::take(&mut self.payment_method),
            ..Self::default()
        };
        Ok(self.step)
    }

    fn ensure(&self, allowed: bool, action: &'static str) -> Result<(), CheckoutError> {
        if allowed {
            Ok(())
        } else {
            Err(CheckoutError::InvalidTransition {
                current: self.step,
                action,
            })
        }
    }
}
