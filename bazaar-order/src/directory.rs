use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Display data for a buyer, owned by the external profile service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: bazaar_shared::UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Read access to buyer display data for order listings and invoices.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn customer(&self, id: &str) -> Option<CustomerProfile>;
}

/// Resolves an opaque object-storage id to a fetchable URL. Used for the
/// store owner's invoice signature image; storage itself lives elsewhere.
#[async_trait]
pub trait SignatureStore: Send + Sync {
    async fn resolve_url(&self, storage_id: &str) -> Option<String>;
}

pub struct InMemoryDirectory {
    customers: RwLock<HashMap<String, CustomerProfile>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            customers: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, profile: CustomerProfile) {
        self.customers
            .write()
            .await
            .insert(profile.id.clone(), profile);
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryDirectory {
    async fn customer(&self, id: &str) -> Option<CustomerProfile> {
        self.customers.read().await.get(id).cloned()
    }
}

/// Signature resolver for deployments without object storage wired in.
pub struct NoopSignatureStore;

#[async_trait]
impl SignatureStore for NoopSignatureStore {
    async fn resolve_url(&self, _storage_id: &str) -> Option<String> {
        None
    }
}
