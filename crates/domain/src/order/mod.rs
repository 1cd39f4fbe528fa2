//! Order payloads shared by the storefront client and the order processor.

mod payment;
mod request;
mod shipping;

pub use payment::{PaymentDetails, PaymentField};
pub use request::{DEFAULT_PAYMENT_METHOD, OrderLine, OrderReceipt, OrderRequest, OrderSubmitter};
pub use shipping::{ShippingField, ShippingInfo};
