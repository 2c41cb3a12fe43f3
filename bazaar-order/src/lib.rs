pub mod directory;
pub mod invoice;
pub mod manager;
pub mod models;
pub mod pricing;
pub mod store;

pub use directory::{
    CustomerDirectory, CustomerProfile, InMemoryDirectory, NoopSignatureStore, SignatureStore,
};
pub use invoice::{Invoice, InvoiceError, InvoiceService, PaymentStatus};
pub use manager::{EnrichedOrder, OrderError, OrderManager, PlaceOrder};
pub use models::{Order, OrderStatus, PaymentMethod, StatusEntry, StatusUpdate};
pub use pricing::{price_order, PriceBreakdown, PricingError};
pub use store::{InMemoryOrderStore, OrderStore};
