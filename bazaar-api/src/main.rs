use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bazaar_api::{app, AppState};
use bazaar_catalog::InMemoryCatalog;
use bazaar_delivery::{DelhiveryClient, Estimator, ServiceabilityOracle};
use bazaar_order::{
    InMemoryDirectory, InMemoryOrderStore, InvoiceService, NoopSignatureStore, OrderManager,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bazaar_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = bazaar_api::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Bazaar API on port {}", config.server.port);

    let oracle: Option<Arc<dyn ServiceabilityOracle>> = match &config.delivery.oracle_token {
        Some(token) => {
            let client = DelhiveryClient::new(
                &config.delivery.oracle_base_url,
                token,
                Duration::from_millis(config.delivery.oracle_timeout_ms),
            )
            .expect("Failed to build courier client");
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!("no courier token configured, delivery estimates use fallback mode");
            None
        }
    };
    let estimator = Arc::new(Estimator::new(&config.delivery.origin_pincode, oracle));

    let catalog = Arc::new(InMemoryCatalog::new());
    let order_store = Arc::new(InMemoryOrderStore::new());
    let directory = Arc::new(InMemoryDirectory::new());

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

    let app = app(AppState {
        orders,
        invoices,
        estimator,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
