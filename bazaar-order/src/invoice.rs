use std::collections::HashMap;
use std::sync::Arc;

use bazaar_catalog::{BusinessAddress, Catalog};
use bazaar_shared::ShippingAddress;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::directory::{CustomerDirectory, SignatureStore};
use crate::models::PaymentMethod;
use crate::pricing::PriceBreakdown;
use crate::store::OrderStore;

const DEFAULT_INVOICE_TERMS: &str = "Thank you for your business!";

#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("store not found for order: {0}")]
    StoreNotFound(Uuid),

    #[error("product not found for order: {0}")]
    ProductNotFound(Uuid),

    #[error("customer not found for order: {0}")]
    CustomerNotFound(String),

    #[error("not authorized to view this invoice")]
    Unauthorized,
}

/// Derived from the order's payment reference, never set directly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Pending,
}

/// Seller identity as it stood when the invoice was issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDetails {
    pub store_name: String,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_phone: String,
    pub business_address: BusinessAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,
    pub invoice_terms: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_url: Option<String>,
}

/// Buyer identity as it stood when the invoice was issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub shipping_address: ShippingAddress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// A read projection over one order.
///
/// Store, customer and product fields are denormalized copies taken at
/// first generation: later profile edits must not rewrite history. The
/// invoice number is allocated once and stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub order_id: Uuid,
    pub buyer_id: bazaar_shared::UserId,
    pub store_id: Uuid,
    pub invoice_number: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub issue_date: DateTime<Utc>,
    pub store_details: StoreDetails,
    pub customer_details: CustomerDetails,
    pub items: Vec<InvoiceLine>,
    #[serde(flatten)]
    pub pricing: PriceBreakdown,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
}

struct Ledger {
    by_order: HashMap<Uuid, Invoice>,
    issued: u64,
}

/// Issues invoices for orders, exactly one per order.
pub struct InvoiceService {
    orders: Arc<dyn OrderStore>,
    catalog: Arc<dyn Catalog>,
    directory: Arc<dyn CustomerDirectory>,
    signatures: Arc<dyn SignatureStore>,
    ledger: RwLock<Ledger>,
}

impl InvoiceService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        catalog: Arc<dyn Catalog>,
        directory: Arc<dyn CustomerDirectory>,
        signatures: Arc<dyn SignatureStore>,
    ) -> Self {
        Self {
            orders,
            catalog,
            directory,
            signatures,
            ledger: RwLock::new(Ledger {
                by_order: HashMap::new(),
                issued: 0,
            }),
        }
    }

    /// Return the order's invoice, allocating it on first call.
    ///
    /// Idempotent: the sequence number only advances when a new invoice is
    /// actually issued, and regeneration returns the stored snapshot
    /// untouched. The order itself is never mutated.
    pub async fn generate(&self, order_id: Uuid, caller: &str) -> Result<Invoice, InvoiceError> {
        let order = self
            .orders
            .get(order_id)
            .await
            .map_err(|_| InvoiceError::OrderNotFound(order_id))?
            .ok_or(InvoiceError::OrderNotFound(order_id))?;

        let store = self
            .catalog
            .store(order.store_id)
            .await
            .ok()
            .flatten()
            .ok_or(InvoiceError::StoreNotFound(order_id))?;

        if caller != order.buyer_id && caller != store.owner_id {
            return Err(InvoiceError::Unauthorized);
        }

        if let Some(existing) = self.ledger.read().await.by_order.get(&order_id) {
            return Ok(existing.clone());
        }

        // Gather the snapshot before taking the write lock; a concurrent
        // allocation for the same order is resolved by the re-check below.
        let product = self
            .catalog
            .product(order.product_id)
            .await
            .ok()
            .flatten()
            .ok_or(InvoiceError::ProductNotFound(order_id))?;
        let customer = self
            .directory
            .customer(&order.buyer_id)
            .await
            .ok_or_else(|| InvoiceError::CustomerNotFound(order.buyer_id.clone()))?;
        let signature_url = match &store.invoice_signature_id {
            Some(storage_id) => self.signatures.resolve_url(storage_id).await,
            None => None,
        };

        let mut ledger = self.ledger.write().await;
        if let Some(existing) = ledger.by_order.get(&order_id) {
            return Ok(existing.clone());
        }

        let issue_date = Utc::now();
        ledger.issued += 1;
        let invoice_number = format!(
            "INV-{}-{:04}",
            issue_date.format("%Y%m%d"),
            ledger.issued
        );

        let invoice = Invoice {
            order_id,
            buyer_id: order.buyer_id.clone(),
            store_id: order.store_id,
            invoice_number,
            issue_date,
            store_details: StoreDetails {
                store_name: store.store_name,
                owner_name: store.owner_name,
                owner_email: store.owner_email,
                owner_phone: store.owner_phone,
                business_address: store.business_address,
                gst_number: store.gst_number,
                invoice_terms: store
                    .invoice_terms
                    .unwrap_or_else(|| DEFAULT_INVOICE_TERMS.to_string()),
                signature_url,
            },
            customer_details: CustomerDetails {
                name: customer.name,
                email: customer.email,
                phone: customer.phone,
                shipping_address: order.shipping_address.clone(),
            },
            items: vec![InvoiceLine {
                product_id: order.product_id,
                product_name: product.name,
                quantity: order.quantity,
                unit_price: order.unit_price_at_order,
                line_total: order.pricing.subtotal,
            }],
            pricing: order.pricing.clone(),
            payment_method: order.payment_method,
            payment_status: if order.payment_reference.is_some() {
                PaymentStatus::Paid
            } else {
                PaymentStatus::Pending
            },
        };

        ledger.by_order.insert(order_id, invoice.clone());
        tracing::info!(order_id = %order_id, invoice = %invoice.invoice_number, "invoice issued");
        Ok(invoice)
    }

    /// Invoices issued against the caller's own orders, newest first.
    /// Anonymous callers get an empty list.
    pub async fn for_user(&self, caller: Option<&str>) -> Vec<Invoice> {
        let Some(user_id) = caller else {
            return Vec::new();
        };

        let ledger = self.ledger.read().await;
        let mut invoices: Vec<Invoice> = ledger
            .by_order
            .values()
            .filter(|i| i.buyer_id == user_id)
            .cloned()
            .collect();
        invoices.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
        invoices
    }

    /// Invoices issued for a store's orders; owner only.
    pub async fn for_store(
        &self,
        store_id: Uuid,
        caller: Option<&str>,
    ) -> Result<Vec<Invoice>, InvoiceError> {
        let Some(caller_id) = caller else {
            return Ok(Vec::new());
        };

        let store = self
            .catalog
            .store(store_id)
            .await
            .ok()
            .flatten()
            .ok_or(InvoiceError::StoreNotFound(store_id))?;
        if store.owner_id != caller_id {
            return Err(InvoiceError::Unauthorized);
        }

        let ledger = self.ledger.read().await;
        let mut invoices: Vec<Invoice> = ledger
            .by_order
            .values()
            .filter(|i| i.store_id == store_id)
            .cloned()
            .collect();
        invoices.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
        Ok(invoices)
    }
}
