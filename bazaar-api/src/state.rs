use std::sync::Arc;

use bazaar_delivery::Estimator;
use bazaar_order::{InvoiceService, OrderManager};

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderManager>,
    pub invoices: Arc<InvoiceService>,
    pub estimator: Arc<Estimator>,
}
