use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bazaar_delivery::DeliveryError;
use bazaar_order::{InvoiceError, OrderError};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// No identity on the request where one is required.
    Unauthenticated,
    /// An identity that is not allowed to touch the resource.
    Unauthorized(String),
    ValidationError(String),
    NotFound(String),
    /// The purchase cannot proceed as asked (stock, COD availability).
    Conflict(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::ProductNotFound(_)
            | OrderError::StoreNotFound(_)
            | OrderError::OrderNotFound(_) => ApiError::NotFound(err.to_string()),
            OrderError::OutOfStock { .. } | OrderError::CodNotAvailable => {
                ApiError::Conflict(err.to_string())
            }
            OrderError::Unauthorized => ApiError::Unauthorized(err.to_string()),
            OrderError::InvalidTransition { .. } | OrderError::Pricing(_) => {
                ApiError::ValidationError(err.to_string())
            }
        }
    }
}

impl From<InvoiceError> for ApiError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::Unauthorized => ApiError::Unauthorized(err.to_string()),
            InvoiceError::OrderNotFound(_)
            | InvoiceError::StoreNotFound(_)
            | InvoiceError::ProductNotFound(_)
            | InvoiceError::CustomerNotFound(_) => ApiError::NotFound(err.to_string()),
        }
    }
}

impl From<DeliveryError> for ApiError {
    fn from(err: DeliveryError) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}
