pub mod estimate;
pub mod estimator;
pub mod oracle;

pub use estimate::{DeliveryEstimate, Serviceability};
pub use estimator::{DeliveryError, Estimator};
pub use oracle::{DelhiveryClient, OracleError, PincodeRecord, ServiceabilityOracle};
