use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sellable catalog entry. Price and stock are the live values the
/// order engine reads at checkout; orders keep their own copies afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub store_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
}

/// Per-order fee settings configured by the store owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreFeeConfig {
    /// Flat service fee per order, not per unit.
    pub store_charges: Option<Decimal>,
    pub gst_applicable: bool,
    /// Percentage, e.g. 18. Falls back to the platform default when unset.
    pub gst_percentage: Option<Decimal>,
    pub cod_available: bool,
    /// Flat fee applied only to cash-on-delivery orders.
    pub cod_charges: Option<Decimal>,
}

/// Registered place of business for a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessAddress {
    pub street: String,
    pub area: String,
    pub pincode: String,
    pub state: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}

/// An independent seller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProfile {
    pub id: Uuid,
    pub owner_id: bazaar_shared::UserId,
    pub store_name: String,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_phone: String,
    pub business_address: BusinessAddress,
    pub gst_number: Option<String>,
    pub invoice_terms: Option<String>,
    /// Opaque object-storage id of the owner's invoice signature image.
    pub invoice_signature_id: Option<String>,
    pub fees: StoreFeeConfig,
}
