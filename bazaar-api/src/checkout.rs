use axum::{extract::State, Json};
use bazaar_order::{PaymentMethod, PlaceOrder, PriceBreakdown};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::identity::Caller;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PricePreviewRequest {
    pub product_id: Uuid,
    pub quantity: u32,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub order_id: Uuid,
}

/// POST /v1/pricing/preview
/// Price a prospective purchase. Read-only; matches the persisted price.
pub async fn price_preview(
    State(state): State<AppState>,
    Json(req): Json<PricePreviewRequest>,
) -> Result<Json<PriceBreakdown>, ApiError> {
    let breakdown = state
        .orders
        .price_preview(req.product_id, req.quantity, req.payment_method)
        .await?;

    Ok(Json(breakdown))
}

/// POST /v1/orders
/// Direct-buy checkout.
pub async fn place_order(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<PlaceOrder>,
) -> Result<Json<PlaceOrderResponse>, ApiError> {
    let buyer_id = caller.required()?;
    let order_id = state.orders.place_order(buyer_id, req).await?;

    Ok(Json(PlaceOrderResponse { order_id }))
}
