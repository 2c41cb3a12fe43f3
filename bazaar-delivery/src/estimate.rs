use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Advisory delivery estimate for a serviceable destination.
///
/// Not persisted on orders; checkout renders it and may attach the
/// human-readable window to the order at shipping time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEstimate {
    pub estimated_days: u32,
    pub estimated_date: NaiveDate,
    pub courier_partner: String,
    pub cash_on_delivery: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Outcome of a serviceability check.
///
/// A destination the courier does not cover (`NotServiceable`) and a
/// courier we could not reach (`Unavailable`) are distinct, and neither is
/// an error: callers must render all three arms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Serviceability {
    Serviceable(DeliveryEstimate),
    NotServiceable { message: String },
    Unavailable { message: String },
}
