use axum::{
    extract::{Path, State},
    Json,
};
use bazaar_delivery::Serviceability;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /v1/delivery/serviceability/{pincode}
/// Advisory serviceability check. The three outcomes (serviceable, not
/// serviceable, courier unavailable) are all 200s; only a malformed
/// pincode is a client error.
pub async fn check_serviceability(
    State(state): State<AppState>,
    Path(pincode): Path<String>,
) -> Result<Json<Serviceability>, ApiError> {
    let outcome = state.estimator.check_serviceability(&pincode).await?;
    Ok(Json(outcome))
}
