use axum::{
    extract::{Path, State},
    Json,
};
use bazaar_order::{EnrichedOrder, Order, StatusUpdate};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::identity::Caller;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(flatten)]
    pub update: StatusUpdate,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /v1/orders/{id}/status
/// Advance an order through its lifecycle. Store owner only.
pub async fn update_status(
    State(state): State<AppState>,
    caller: Caller,
    Path(order_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, ApiError> {
    let caller_id = caller.required()?;
    let order = state
        .orders
        .update_status(caller_id, order_id, req.update, req.location, req.description)
        .await?;

    Ok(Json(order))
}

/// GET /v1/orders
/// The caller's own orders, newest first.
pub async fn list_my_orders(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<EnrichedOrder>>, ApiError> {
    let orders = state.orders.orders_for_buyer(caller.id()).await?;
    Ok(Json(orders))
}

/// GET /v1/orders/{id}
/// Single order details for the buyer or the store owner.
pub async fn get_order(
    State(state): State<AppState>,
    caller: Caller,
    Path(order_id): Path<Uuid>,
) -> Result<Json<EnrichedOrder>, ApiError> {
    let caller_id = caller.required()?;
    let order = state.orders.order_details(order_id, caller_id).await?;
    Ok(Json(order))
}

/// GET /v1/stores/{id}/orders
/// Orders received by a store. Owner only.
pub async fn store_orders(
    State(state): State<AppState>,
    caller: Caller,
    Path(store_id): Path<Uuid>,
) -> Result<Json<Vec<EnrichedOrder>>, ApiError> {
    let orders = state.orders.orders_for_store(store_id, caller.id()).await?;
    Ok(Json(orders))
}
