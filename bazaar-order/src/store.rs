use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::manager::OrderError;
use crate::models::{Order, StatusEntry, StatusUpdate};

/// Order persistence seam.
///
/// `transition` performs the whole read-validate-write of a status change
/// so that implementations can serialize concurrent transitions against
/// the same order; validating outside the store would reintroduce the
/// read-then-write race.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: Order) -> Result<(), OrderError>;

    async fn get(&self, id: Uuid) -> Result<Option<Order>, OrderError>;

    /// Orders placed by a buyer, newest first.
    async fn for_buyer(&self, buyer_id: &str) -> Result<Vec<Order>, OrderError>;

    /// Orders received by a store, newest first.
    async fn for_store(&self, store_id: Uuid) -> Result<Vec<Order>, OrderError>;

    /// Validate the transition against the state graph, patch the fields
    /// the update carries, and append exactly one history entry.
    async fn transition(
        &self,
        id: Uuid,
        update: StatusUpdate,
        location: Option<String>,
        description: Option<String>,
    ) -> Result<Order, OrderError>;
}

/// In-memory order store. One `RwLock` guards the map, so every
/// `transition` call is a single critical section and history entries for
/// an order form a total sequence.
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<(), OrderError> {
        self.orders.write().await.insert(order.id, order);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, OrderError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn for_buyer(&self, buyer_id: &str) -> Result<Vec<Order>, OrderError> {
        let orders = self.orders.read().await;
        let mut matching: Vec<Order> = orders
            .values()
            .filter(|o| o.buyer_id == buyer_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn for_store(&self, store_id: Uuid) -> Result<Vec<Order>, OrderError> {
        let orders = self.orders.read().await;
        let mut matching: Vec<Order> = orders
            .values()
            .filter(|o| o.store_id == store_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn transition(
        &self,
        id: Uuid,
        update: StatusUpdate,
        location: Option<String>,
        description: Option<String>,
    ) -> Result<Order, OrderError> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).ok_or(OrderError::OrderNotFound(id))?;

        let target = update.target();
        if !order.status.can_transition_to(target) {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: target,
            });
        }

        match &update {
            StatusUpdate::Shipped {
                tracking_id,
                courier_name,
                estimated_delivery_time,
            } => {
                if tracking_id.is_some() {
                    order.tracking_id = tracking_id.clone();
                }
                if courier_name.is_some() {
                    order.courier_name = courier_name.clone();
                }
                if estimated_delivery_time.is_some() {
                    order.estimated_delivery_time = estimated_delivery_time.clone();
                }
            }
            StatusUpdate::Cancelled { reason } => {
                if reason.is_some() {
                    order.cancellation_reason = reason.clone();
                }
            }
            StatusUpdate::Processing | StatusUpdate::Delivered | StatusUpdate::Refunded => {}
        }

        order.status = target;
        order.status_history.push(StatusEntry {
            status: target,
            timestamp: Utc::now(),
            location,
            description: Some(
                description.unwrap_or_else(|| format!("Order status updated to {target}")),
            ),
        });

        Ok(order.clone())
    }
}
