use async_trait::async_trait;
use uuid::Uuid;

use crate::product::{Product, StoreProfile};

/// Catalog access errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("insufficient stock: requested {requested}, available {available}")]
    OutOfStock { requested: u32, available: u32 },
}

/// Read access to products and store configuration, plus the two stock
/// operations the order engine needs.
///
/// `decrement_stock` must check and decrement as one indivisible unit per
/// product: two concurrent decrements may never drive stock negative.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn product(&self, id: Uuid) -> Result<Option<Product>, CatalogError>;

    async fn store(&self, id: Uuid) -> Result<Option<StoreProfile>, CatalogError>;

    /// Atomically decrement stock if at least `amount` units are available.
    async fn decrement_stock(&self, product_id: Uuid, amount: u32) -> Result<(), CatalogError>;

    /// Return previously decremented units, compensating a failed checkout.
    async fn restore_stock(&self, product_id: Uuid, amount: u32) -> Result<(), CatalogError>;
}
