use axum::{
    extract::{Path, State},
    Json,
};
use bazaar_order::Invoice;
use uuid::Uuid;

use crate::error::ApiError;
use crate::identity::Caller;
use crate::state::AppState;

/// GET /v1/orders/{id}/invoice
/// The order's invoice; allocated on first request, stable afterwards.
pub async fn get_invoice(
    State(state): State<AppState>,
    caller: Caller,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    let caller_id = caller.required()?;
    let invoice = state.invoices.generate(order_id, caller_id).await?;
    Ok(Json(invoice))
}

/// GET /v1/invoices
/// Invoices for the caller's own orders.
pub async fn list_my_invoices(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    Ok(Json(state.invoices.for_user(caller.id()).await))
}

/// GET /v1/stores/{id}/invoices
/// Invoices issued for a store's orders. Owner only.
pub async fn store_invoices(
    State(state): State<AppState>,
    caller: Caller,
    Path(store_id): Path<Uuid>,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    let invoices = state.invoices.for_store(store_id, caller.id()).await?;
    Ok(Json(invoices))
}
