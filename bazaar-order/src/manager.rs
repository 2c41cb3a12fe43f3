use std::sync::Arc;

use bazaar_catalog::{Catalog, CatalogError};
use bazaar_shared::ShippingAddress;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::directory::CustomerDirectory;
use crate::models::{Order, OrderStatus, PaymentMethod, StatusUpdate};
use crate::pricing::{price_order, PriceBreakdown, PricingError};
use crate::store::OrderStore;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("store not found: {0}")]
    StoreNotFound(Uuid),

    #[error("order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("insufficient stock: requested {requested}, available {available}")]
    OutOfStock { requested: u32, available: u32 },

    #[error("cash on delivery is not available for this store")]
    CodNotAvailable,

    #[error("not authorized to access this order")]
    Unauthorized,

    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl From<CatalogError> for OrderError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ProductNotFound(id) => OrderError::ProductNotFound(id),
            CatalogError::OutOfStock {
                requested,
                available,
            } => OrderError::OutOfStock {
                requested,
                available,
            },
        }
    }
}

/// Checkout input for a direct-buy purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrder {
    pub product_id: Uuid,
    pub quantity: u32,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    /// Reference obtained from the external payment flow, online orders only.
    #[serde(default)]
    pub payment_reference: Option<String>,
}

/// An order joined with the display names a dashboard needs.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedOrder {
    #[serde(flatten)]
    pub order: Order,
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

/// Creates orders and advances them through the status lifecycle.
pub struct OrderManager {
    catalog: Arc<dyn Catalog>,
    orders: Arc<dyn OrderStore>,
    directory: Arc<dyn CustomerDirectory>,
}

impl OrderManager {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        orders: Arc<dyn OrderStore>,
        directory: Arc<dyn CustomerDirectory>,
    ) -> Self {
        Self {
            catalog,
            orders,
            directory,
        }
    }

    /// Price a prospective purchase without side effects. Uses the same
    /// calculator as `place_order`, so the preview matches the persisted
    /// breakdown exactly.
    pub async fn price_preview(
        &self,
        product_id: Uuid,
        quantity: u32,
        payment_method: PaymentMethod,
    ) -> Result<PriceBreakdown, OrderError> {
        let product = self
            .catalog
            .product(product_id)
            .await?
            .ok_or(OrderError::ProductNotFound(product_id))?;
        let store = self
            .catalog
            .store(product.store_id)
            .await?
            .ok_or(OrderError::StoreNotFound(product.store_id))?;

        Ok(price_order(
            product.price,
            quantity,
            &store.fees,
            payment_method,
        )?)
    }

    /// Create an order: price it, take the stock, persist it, all or
    /// nothing. The stock decrement is atomic in the catalog; if the
    /// insert fails afterwards the units are put back before the error
    /// propagates.
    pub async fn place_order(&self, buyer_id: &str, request: PlaceOrder) -> Result<Uuid, OrderError> {
        let product = self
            .catalog
            .product(request.product_id)
            .await?
            .ok_or(OrderError::ProductNotFound(request.product_id))?;
        let store = self
            .catalog
            .store(product.store_id)
            .await?
            .ok_or(OrderError::StoreNotFound(product.store_id))?;

        if request.payment_method == PaymentMethod::Cod && !store.fees.cod_available {
            return Err(OrderError::CodNotAvailable);
        }

        let pricing = price_order(
            product.price,
            request.quantity,
            &store.fees,
            request.payment_method,
        )?;

        self.catalog
            .decrement_stock(product.id, request.quantity)
            .await?;

        let order = Order::placed(
            buyer_id.to_string(),
            store.id,
            product.id,
            request.quantity,
            product.price,
            request.shipping_address,
            request.payment_method,
            request.payment_reference,
            pricing,
        );
        let order_id = order.id;

        if let Err(err) = self.orders.insert(order).await {
            if let Err(restore_err) = self
                .catalog
                .restore_stock(product.id, request.quantity)
                .await
            {
                tracing::error!(
                    product_id = %product.id,
                    error = %restore_err,
                    "failed to restore stock after aborted order insert"
                );
            }
            return Err(err);
        }

        tracing::info!(order_id = %order_id, buyer_id = %buyer_id, "order placed");
        Ok(order_id)
    }

    /// Advance an order's status. Only the owning store's owner may call
    /// this; the transition itself is validated and applied atomically by
    /// the order store.
    pub async fn update_status(
        &self,
        caller: &str,
        order_id: Uuid,
        update: StatusUpdate,
        location: Option<String>,
        description: Option<String>,
    ) -> Result<Order, OrderError> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        let store = self.catalog.store(order.store_id).await?;
        if store.map(|s| s.owner_id) != Some(caller.to_string()) {
            return Err(OrderError::Unauthorized);
        }

        let updated = self
            .orders
            .transition(order_id, update, location, description)
            .await?;

        tracing::info!(order_id = %order_id, status = %updated.status, "order status updated");
        Ok(updated)
    }

    /// A buyer's own orders, enriched with product and store names. An
    /// anonymous caller gets an empty list, not an error.
    pub async fn orders_for_buyer(
        &self,
        caller: Option<&str>,
    ) -> Result<Vec<EnrichedOrder>, OrderError> {
        let Some(buyer_id) = caller else {
            return Ok(Vec::new());
        };

        let orders = self.orders.for_buyer(buyer_id).await?;
        let mut enriched = Vec::with_capacity(orders.len());
        for order in orders {
            let product_name = self.product_name(order.product_id).await;
            let store_name = self.store_name(order.store_id).await;
            enriched.push(EnrichedOrder {
                order,
                product_name,
                store_name: Some(store_name),
                customer_name: None,
                customer_email: None,
            });
        }
        Ok(enriched)
    }

    /// A store's received orders, enriched with product and customer
    /// details. Only the store owner may see them.
    pub async fn orders_for_store(
        &self,
        store_id: Uuid,
        caller: Option<&str>,
    ) -> Result<Vec<EnrichedOrder>, OrderError> {
        let Some(caller_id) = caller else {
            return Ok(Vec::new());
        };

        let store = self
            .catalog
            .store(store_id)
            .await?
            .ok_or(OrderError::StoreNotFound(store_id))?;
        if store.owner_id != caller_id {
            return Err(OrderError::Unauthorized);
        }

        let orders = self.orders.for_store(store_id).await?;
        let mut enriched = Vec::with_capacity(orders.len());
        for order in orders {
            let product_name = self.product_name(order.product_id).await;
            let customer = self.directory.customer(&order.buyer_id).await;
            enriched.push(EnrichedOrder {
                order,
                product_name,
                store_name: None,
                customer_name: Some(
                    customer
                        .as_ref()
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| "Unknown Customer".to_string()),
                ),
                customer_email: Some(
                    customer.map(|c| c.email).unwrap_or_default(),
                ),
            });
        }
        Ok(enriched)
    }

    /// Single-order view for the buyer or the owning store's owner.
    pub async fn order_details(
        &self,
        order_id: Uuid,
        caller: &str,
    ) -> Result<EnrichedOrder, OrderError> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        let store = self.catalog.store(order.store_id).await?;
        let is_owner = store
            .as_ref()
            .map(|s| s.owner_id == caller)
            .unwrap_or(false);
        if order.buyer_id != caller && !is_owner {
            return Err(OrderError::Unauthorized);
        }

        let product_name = self.product_name(order.product_id).await;
        let customer = self.directory.customer(&order.buyer_id).await;
        Ok(EnrichedOrder {
            product_name,
            store_name: Some(
                store
                    .map(|s| s.store_name)
                    .unwrap_or_else(|| "Unknown Store".to_string()),
            ),
            customer_name: Some(
                customer
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "Unknown Customer".to_string()),
            ),
            customer_email: Some(customer.map(|c| c.email).unwrap_or_default()),
            order,
        })
    }

    async fn product_name(&self, product_id: Uuid) -> String {
        match self.catalog.product(product_id).await {
            Ok(Some(product)) => product.name,
            _ => "Unknown Product".to_string(),
        }
    }

    async fn store_name(&self, store_id: Uuid) -> String {
        match self.catalog.store(store_id).await {
            Ok(Some(store)) => store.store_name,
            _ => "Unknown Store".to_string(),
        }
    }
}
