use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use bazaar_api::{app, AppState};
use bazaar_catalog::{BusinessAddress, InMemoryCatalog, Product, StoreFeeConfig, StoreProfile};
use bazaar_delivery::Estimator;
use bazaar_order::{
    CustomerProfile, InMemoryDirectory, InMemoryOrderStore, InvoiceService, NoopSignatureStore,
    OrderManager,
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

const OWNER: &str = "owner-1";
const BUYER: &str = "buyer-1";

struct TestApp {
    router: axum::Router,
    product_id: Uuid,
    store_id: Uuid,
}

async fn test_app() -> TestApp {
    let catalog = Arc::new(InMemoryCatalog::new());
    let store = StoreProfile {
        id: Uuid::new_v4(),
        owner_id: OWNER.to_string(),
        store_name: "Karma Ceramics".to_string(),
        owner_name: "Asha Rao".to_string(),
        owner_email: "asha@karmaceramics.example".to_string(),
        owner_phone: "+91-9000000000".to_string(),
        business_address: BusinessAddress {
            street: "14 Pottery Lane".to_string(),
            area: "Aundh".to_string(),
            pincode: "411007".to_string(),
            state: "Maharashtra".to_string(),
            country: "India".to_string(),
            landmark: None,
        },
        gst_number: None,
        invoice_terms: None,
        invoice_signature_id: None,
        fees: StoreFeeConfig {
            store_charges: Some(Decimal::from(20)),
            gst_applicable: true,
            gst_percentage: Some(Decimal::from(18)),
            cod_available: true,
            cod_charges: Some(Decimal::from(15)),
        },
    };
    let store_id = store.id;
    let product = Product {
        id: Uuid::new_v4(),
        store_id,
        name: "Clay kettle".to_string(),
        price: Decimal::from(500),
        stock: 10,
    };
    let product_id = product.id;
    catalog.insert_store(store).await;
    catalog.insert_product(product).await;

    let directory = Arc::new(InMemoryDirectory::new());
    directory
        .insert(CustomerProfile {
            id: BUYER.to_string(),
            name: "Ravi Kumar".to_string(),
            email: "ravi@example.com".to_string(),
            phone: None,
        })
        .await;

    let order_store = Arc::new(InMemoryOrderStore::new());
    let orders = Arc::new(OrderManager::new(
        catalog.clone(),
        order_store.clone(),
        directory.clone(),
    ));
    let invoices = Arc::new(InvoiceService::new(
        order_store,
        catalog,
        directory,
        Arc::new(NoopSignatureStore),
    ));
    let estimator = Arc::new(Estimator::new("110001", None));

    TestApp {
        router: app(AppState {
            orders,
            invoices,
            estimator,
        }),
        product_id,
        store_id,
    }
}

fn shipping_address() -> Value {
    json!({
        "type": "home",
        "street": "221B MG Road",
        "area": "Shivajinagar",
        "pincode": "411005",
        "city": "Pune",
        "state": "Maharashtra",
        "country": "India"
    })
}

fn request(method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Monetary fields wire as decimal strings; compare them as decimals so a
/// differing scale ("270" vs "270.00") is not a spurious failure.
fn dec(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn price_preview_matches_the_worked_example() {
    let app = test_app().await;

    let response = app
        .router
        .oneshot(request(
            "POST",
            "/v1/pricing/preview",
            None,
            Some(json!({
                "product_id": app.product_id,
                "quantity": 3,
                "payment_method": "cod"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(dec(&body["subtotal"]), Decimal::from(1500));
    assert_eq!(dec(&body["gst_amount"]), Decimal::from(270));
    assert_eq!(dec(&body["final_total"]), Decimal::from(1805));
}

#[tokio::test]
async fn checkout_requires_identity() {
    let app = test_app().await;

    let response = app
        .router
        .oneshot(request(
            "POST",
            "/v1/orders",
            None,
            Some(json!({
                "product_id": app.product_id,
                "quantity": 1,
                "shipping_address": shipping_address(),
                "payment_method": "online"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn placed_orders_show_up_in_the_buyer_listing() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/v1/orders",
            Some(BUYER),
            Some(json!({
                "product_id": app.product_id,
                "quantity": 3,
                "shipping_address": shipping_address(),
                "payment_method": "cod"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listing = app
        .router
        .oneshot(request("GET", "/v1/orders", Some(BUYER), None))
        .await
        .unwrap();
    assert_eq!(listing.status(), StatusCode::OK);

    let body = body_json(listing).await;
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["product_name"], json!("Clay kettle"));
    assert_eq!(orders[0]["status"], json!("placed"));
    assert_eq!(dec(&orders[0]["final_total"]), Decimal::from(1805));
}

#[tokio::test]
async fn over_stock_checkout_conflicts() {
    let app = test_app().await;

    let response = app
        .router
        .oneshot(request(
            "POST",
            "/v1/orders",
            Some(BUYER),
            Some(json!({
                "product_id": app.product_id,
                "quantity": 99,
                "shipping_address": shipping_address(),
                "payment_method": "online"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn only_the_owner_may_update_status() {
    let app = test_app().await;

    let placed = app
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/v1/orders",
            Some(BUYER),
            Some(json!({
                "product_id": app.product_id,
                "quantity": 1,
                "shipping_address": shipping_address(),
                "payment_method": "online"
            })),
        ))
        .await
        .unwrap();
    let order_id = body_json(placed).await["order_id"].as_str().unwrap().to_string();

    let forbidden = app
        .router
        .clone()
        .oneshot(request(
            "POST",
            &format!("/v1/orders/{order_id}/status"),
            Some(BUYER),
            Some(json!({ "status": "processing" })),
        ))
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let accepted = app
        .router
        .oneshot(request(
            "POST",
            &format!("/v1/orders/{order_id}/status"),
            Some(OWNER),
            Some(json!({ "status": "processing", "location": "Pune hub" })),
        ))
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::OK);

    let body = body_json(accepted).await;
    assert_eq!(body["status"], json!("processing"));
    assert_eq!(body["status_history"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn invoice_is_stable_across_requests() {
    let app = test_app().await;

    let placed = app
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/v1/orders",
            Some(BUYER),
            Some(json!({
                "product_id": app.product_id,
                "quantity": 2,
                "shipping_address": shipping_address(),
                "payment_method": "cod"
            })),
        ))
        .await
        .unwrap();
    let order_id = body_json(placed).await["order_id"].as_str().unwrap().to_string();

    let first = app
        .router
        .clone()
        .oneshot(request(
            "GET",
            &format!("/v1/orders/{order_id}/invoice"),
            Some(BUYER),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first_body = body_json(first).await;
    assert_eq!(first_body["payment_status"], json!("Pending"));

    let second = app
        .router
        .oneshot(request(
            "GET",
            &format!("/v1/orders/{order_id}/invoice"),
            Some(BUYER),
            None,
        ))
        .await
        .unwrap();
    let second_body = body_json(second).await;
    assert_eq!(first_body["invoice_number"], second_body["invoice_number"]);
}

#[tokio::test]
async fn store_listings_are_owner_only() {
    let app = test_app().await;

    let forbidden = app
        .router
        .clone()
        .oneshot(request(
            "GET",
            &format!("/v1/stores/{}/orders", app.store_id),
            Some(BUYER),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let allowed = app
        .router
        .oneshot(request(
            "GET",
            &format!("/v1/stores/{}/orders", app.store_id),
            Some(OWNER),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_pincode_is_a_client_error() {
    let app = test_app().await;

    let response = app
        .router
        .oneshot(request("GET", "/v1/delivery/serviceability/12345", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fallback_serviceability_is_always_available() {
    let app = test_app().await;

    let response = app
        .router
        .oneshot(request(
            "GET",
            "/v1/delivery/serviceability/411005",
            None,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["outcome"], json!("serviceable"));
    assert_eq!(body["courier_partner"], json!("Delhivery"));
}
