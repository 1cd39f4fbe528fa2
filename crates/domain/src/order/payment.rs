//! Card details collected on the Payment step.
//!
//! These never leave the client: only the payment method tag is sent with
//! the order.

/// Card details entered by the user. Each field must be non-blank; nothing
/// is checked against a payment network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentDetails {
    pub cardholder_name: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

/// A field of [`PaymentDetails`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentField {
    CardholderName,
    CardNumber,
    Expiry,
    Cvv,
}

impl std::fmt::Display for PaymentField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PaymentField::CardholderName => "cardholder name",
            PaymentField::CardNumber => "card number",
            PaymentField::Expiry => "expiry",
            PaymentField::Cvv => "cvv",
        };
        write!(f, "{name}")
    }
}

impl PaymentDetails {
    /// Creates payment details.
    pub fn new(
        cardholder_name: impl Into<String>,
        card_number: impl Into<String>,
        expiry: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            cardholder_name: cardholder_name.into(),
            card_number: card_number.into(),
            expiry: expiry.into(),
            cvv: cvv.into(),
        }
    }

    /// Returns the first blank field, if any.
    pub fn missing_field(&self) -> Option<PaymentField> {
        [
            (PaymentField::CardholderName, &self.cardholder_name),
            (PaymentField::CardNumber, &self.card_number),
            (PaymentField::Expiry, &self.expiry),
            (PaymentField::Cvv, &self.cvv),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}
