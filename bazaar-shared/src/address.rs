use serde::{Deserialize, Serialize};

/// Shipping destination captured at checkout.
///
/// Copied onto the order (and later onto the invoice) as a frozen value,
/// never a reference into the buyer's mutable address book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingAddress {
    /// Address label, e.g. "home" or "work".
    #[serde(rename = "type")]
    pub kind: String,
    pub street: String,
    pub area: String,
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}
