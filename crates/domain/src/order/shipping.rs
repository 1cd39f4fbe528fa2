//! Shipping details collected on the Shipping step.

use serde::{Deserialize, Serialize};

/// Where the order goes. Every field is required.
///
/// Serialized as the `customer` object of an order request, with
/// `zip_code` spelled `zipCode` on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
}

/// A field of [`ShippingInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShippingField {
    Name,
    Email,
    Address,
    City,
    ZipCode,
}

impl ShippingField {
    /// Returns the wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingField::Name => "name",
            ShippingField::Email => "email",
            ShippingField::Address => "address",
            ShippingField::City => "city",
            ShippingField::ZipCode => "zipCode",
        }
    }
}

impl std::fmt::Display for ShippingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ShippingInfo {
    /// Creates shipping info from its five fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            address: address.into(),
            city: city.into(),
            zip_code: zip_code.into(),
        }
    }

    /// Returns the first blank field, if any.
    ///
    /// Only presence is checked; email and zip formats are not.
    pub fn missing_field(&self) -> Option<ShippingField> {
        [
            (ShippingField::Name, &self.name),
            (ShippingField::Email, &self.email),
            (ShippingField::Address, &self.address),
            (ShippingField::City, &self.city),
            (ShippingField::ZipCode, &self.zip_code),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}
