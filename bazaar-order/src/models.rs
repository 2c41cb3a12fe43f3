use std::fmt;

use bazaar_shared::ShippingAddress;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::PriceBreakdown;

/// Order status in the lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Placed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// The legal transition graph. Delivered, cancelled and refunded are
    /// terminal; cancellation is only possible before shipping; refunds
    /// only once the order has progressed past placement.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Placed, Processing)
                | (Processing, Shipped)
                | (Shipped, Delivered)
                | (Placed, Cancelled)
                | (Processing, Cancelled)
                | (Processing, Refunded)
                | (Shipped, Refunded)
                | (Delivered, Refunded)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cod,
    Online,
}

/// One entry in the order's append-only audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    pub status: OrderStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A store-owner-initiated status change, carrying exactly the fields the
/// target status may patch. "Ship" carries tracking details, "cancel" a
/// reason; nothing else is patchable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatusUpdate {
    Processing,
    Shipped {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tracking_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        courier_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        estimated_delivery_time: Option<String>,
    },
    Delivered,
    Cancelled {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Refunded,
}

impl StatusUpdate {
    pub fn target(&self) -> OrderStatus {
        match self {
            StatusUpdate::Processing => OrderStatus::Processing,
            StatusUpdate::Shipped { .. } => OrderStatus::Shipped,
            StatusUpdate::Delivered => OrderStatus::Delivered,
            StatusUpdate::Cancelled { .. } => OrderStatus::Cancelled,
            StatusUpdate::Refunded => OrderStatus::Refunded,
        }
    }
}

/// The single source of truth for a purchase.
///
/// Commerce facts and the pricing breakdown are written once at creation
/// and never recomputed; only the lifecycle fields change afterwards, and
/// `status_history` only ever grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub buyer_id: bazaar_shared::UserId,
    pub store_id: Uuid,
    pub product_id: Uuid,

    pub quantity: u32,
    pub unit_price_at_order: Decimal,
    pub shipping_address: ShippingAddress,

    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,

    #[serde(flatten)]
    pub pricing: PriceBreakdown,

    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courier_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,

    pub status_history: Vec<StatusEntry>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build a freshly placed order with its first audit entry.
    #[allow(clippy::too_many_arguments)]
    pub fn placed(
        buyer_id: bazaar_shared::UserId,
        store_id: Uuid,
        product_id: Uuid,
        quantity: u32,
        unit_price_at_order: Decimal,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
        payment_reference: Option<String>,
        pricing: PriceBreakdown,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            buyer_id,
            store_id,
            product_id,
            quantity,
            unit_price_at_order,
            shipping_address,
            payment_method,
            payment_reference,
            pricing,
            status: OrderStatus::Placed,
            tracking_id: None,
            courier_name: None,
            estimated_delivery_time: None,
            cancellation_reason: None,
            status_history: vec![StatusEntry {
                status: OrderStatus::Placed,
                timestamp: now,
                location: None,
                description: Some("Order has been placed successfully".to_string()),
            }],
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_chain_is_legal() {
        use OrderStatus::*;
        assert!(Placed.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
    }

    #[test]
    fn terminal_states_go_nowhere() {
        use OrderStatus::*;
        for terminal in [Delivered, Cancelled, Refunded] {
            for next in [Placed, Processing, Shipped, Delivered, Cancelled] {
                assert!(!terminal.can_transition_to(next), "{terminal} -> {next}");
            }
        }
        // The one exception: a delivered order can still be refunded.
        assert!(Delivered.can_transition_to(Refunded));
    }

    #[test]
    fn cancellation_stops_at_shipping() {
        use OrderStatus::*;
        assert!(Placed.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Cancelled));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
    }

    #[test]
    fn refund_requires_progress_past_placement() {
        use OrderStatus::*;
        assert!(!Placed.can_transition_to(Refunded));
        assert!(Processing.can_transition_to(Refunded));
        assert!(Shipped.can_transition_to(Refunded));
    }

    #[test]
    fn backward_moves_are_illegal() {
        use OrderStatus::*;
        assert!(!Delivered.can_transition_to(Processing));
        assert!(!Shipped.can_transition_to(Placed));
        assert!(!Processing.can_transition_to(Placed));
    }
}
