use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::accessor::{Catalog, CatalogError};
use crate::product::{Product, StoreProfile};

struct Tables {
    products: HashMap<Uuid, Product>,
    stores: HashMap<Uuid, StoreProfile>,
}

/// In-memory catalog backing the order engine.
///
/// Every stock mutation runs inside a single write-lock section, so the
/// stock check and the decrement are one critical section per call.
pub struct InMemoryCatalog {
    inner: RwLock<Tables>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Tables {
                products: HashMap::new(),
                stores: HashMap::new(),
            }),
        }
    }

    pub async fn insert_store(&self, store: StoreProfile) {
        self.inner.write().await.stores.insert(store.id, store);
    }

    pub async fn insert_product(&self, product: Product) {
        self.inner.write().await.products.insert(product.id, product);
    }

    pub async fn stock(&self, product_id: Uuid) -> Option<u32> {
        self.inner.read().await.products.get(&product_id).map(|p| p.stock)
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn product(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
        Ok(self.inner.read().await.products.get(&id).cloned())
    }

    async fn store(&self, id: Uuid) -> Result<Option<StoreProfile>, CatalogError> {
        Ok(self.inner.read().await.stores.get(&id).cloned())
    }

    async fn decrement_stock(&self, product_id: Uuid, amount: u32) -> Result<(), CatalogError> {
        let mut tables = self.inner.write().await;
        let product = tables
            .products
            .get_mut(&product_id)
            .ok_or(CatalogError::ProductNotFound(product_id))?;

        if product.stock < amount {
            return Err(CatalogError::OutOfStock {
                requested: amount,
                available: product.stock,
            });
        }

        product.stock -= amount;
        Ok(())
    }

    async fn restore_stock(&self, product_id: Uuid, amount: u32) -> Result<(), CatalogError> {
        let mut tables = self.inner.write().await;
        let product = tables
            .products
            .get_mut(&product_id)
            .ok_or(CatalogError::ProductNotFound(product_id))?;

        product.stock = product.stock.saturating_add(amount);
        Ok(())
    }
}
