use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod app_config;
pub mod checkout;
pub mod delivery;
pub mod error;
pub mod identity;
pub mod invoices;
pub mod orders;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderName::from_static("x-user-id"),
        ]);

    Router::new()
        .route("/v1/pricing/preview", post(checkout::price_preview))
        .route(
            "/v1/orders",
            post(checkout::place_order).get(orders::list_my_orders),
        )
        .route("/v1/orders/{id}", get(orders::get_order))
        .route("/v1/orders/{id}/status", post(orders::update_status))
        .route("/v1/orders/{id}/invoice", get(invoices::get_invoice))
        .route("/v1/invoices", get(invoices::list_my_invoices))
        .route("/v1/stores/{id}/orders", get(orders::store_orders))
        .route("/v1/stores/{id}/invoices", get(invoices::store_invoices))
        .route(
            "/v1/delivery/serviceability/{pincode}",
            get(delivery::check_serviceability),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
