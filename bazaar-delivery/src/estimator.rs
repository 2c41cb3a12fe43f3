use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};

use crate::estimate::{DeliveryEstimate, Serviceability};
use crate::oracle::{OracleError, PincodeRecord, ServiceabilityOracle};

const COURIER_PARTNER: &str = "Delhivery";
const MAX_TRANSIT_DAYS: u32 = 7;

const NOT_SERVICEABLE_MESSAGE: &str =
    "Sorry, we don't deliver to this pincode yet. Please try a different pincode or contact support.";
const NOT_CONFIGURED_MESSAGE: &str =
    "Delivery checks are not configured. Please try again later or contact support.";
const UNREACHABLE_MESSAGE: &str = "Unable to check delivery right now. Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("pincode must be exactly 6 digits")]
    InvalidPincode,
}

/// Validate a destination pincode before anything leaves the process.
pub fn validate_pincode(pincode: &str) -> Result<(), DeliveryError> {
    if pincode.len() == 6 && pincode.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(DeliveryError::InvalidPincode)
    }
}

/// Serviceability checks with graceful degradation.
///
/// With an oracle the courier is asked once per check; oracle failure
/// degrades to `Unavailable` rather than an error. Without an oracle the
/// estimator runs in fallback mode and derives a deterministic,
/// always-serviceable estimate from pincode distance.
pub struct Estimator {
    origin_pincode: String,
    oracle: Option<Arc<dyn ServiceabilityOracle>>,
}

impl Estimator {
    pub fn new(origin_pincode: &str, oracle: Option<Arc<dyn ServiceabilityOracle>>) -> Self {
        Self {
            origin_pincode: origin_pincode.to_string(),
            oracle,
        }
    }

    pub async fn check_serviceability(
        &self,
        destination: &str,
    ) -> Result<Serviceability, DeliveryError> {
        validate_pincode(destination)?;
        let today = Utc::now().date_naive();

        let Some(oracle) = &self.oracle else {
            return Ok(Serviceability::Serviceable(
                self.fallback_estimate_from(destination, today),
            ));
        };

        let outcome = match oracle.lookup(destination).await {
            Ok(Some(record)) => {
                Serviceability::Serviceable(self.estimate_from(destination, &record, today))
            }
            Ok(None) => Serviceability::NotServiceable {
                message: NOT_SERVICEABLE_MESSAGE.to_string(),
            },
            Err(OracleError::MissingCredential) => {
                tracing::warn!("serviceability oracle has no credential configured");
                Serviceability::Unavailable {
                    message: NOT_CONFIGURED_MESSAGE.to_string(),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "serviceability oracle unreachable");
                Serviceability::Unavailable {
                    message: UNREACHABLE_MESSAGE.to_string(),
                }
            }
        };

        Ok(outcome)
    }

    /// Deterministic estimate used when the oracle path is entirely
    /// unavailable. Always serviceable.
    pub fn fallback_estimate(&self, destination: &str) -> Result<DeliveryEstimate, DeliveryError> {
        validate_pincode(destination)?;
        Ok(self.fallback_estimate_from(destination, Utc::now().date_naive()))
    }

    fn estimate_from(
        &self,
        destination: &str,
        record: &PincodeRecord,
        today: NaiveDate,
    ) -> DeliveryEstimate {
        let days = padded_transit_days(&self.origin_pincode, destination, today);

        DeliveryEstimate {
            estimated_days: days,
            estimated_date: delivery_date(today, days),
            courier_partner: COURIER_PARTNER.to_string(),
            cash_on_delivery: record.cash_on_delivery,
            district: record.district.clone(),
            state: record.state.clone(),
        }
    }

    fn fallback_estimate_from(&self, destination: &str, today: NaiveDate) -> DeliveryEstimate {
        let days = padded_transit_days(&self.origin_pincode, destination, today);

        DeliveryEstimate {
            estimated_days: days,
            estimated_date: delivery_date(today, days),
            courier_partner: COURIER_PARTNER.to_string(),
            cash_on_delivery: true,
            district: None,
            state: None,
        }
    }
}

/// Base transit time from the numeric distance between the postal regions
/// (first two pincode digits), plus one padding day per Sunday inside the
/// transit window, capped at `MAX_TRANSIT_DAYS`.
fn padded_transit_days(origin: &str, destination: &str, start: NaiveDate) -> u32 {
    let base = base_transit_days(origin, destination);

    let mut days = base;
    for offset in 1..=base {
        if (start + Duration::days(i64::from(offset))).weekday() == Weekday::Sun {
            days += 1;
        }
    }

    days.min(MAX_TRANSIT_DAYS)
}

fn base_transit_days(origin: &str, destination: &str) -> u32 {
    let distance = postal_region(origin).abs_diff(postal_region(destination));
    match distance {
        0 => 1,
        1..=5 => 2,
        6..=15 => 3,
        _ => 5,
    }
}

fn postal_region(pincode: &str) -> u32 {
    pincode.get(..2).and_then(|p| p.parse().ok()).unwrap_or(0)
}

/// Sunday is the designated non-delivery day; a date landing on it shifts
/// forward one day.
fn delivery_date(start: NaiveDate, days: u32) -> NaiveDate {
    let mut date = start + Duration::days(i64::from(days));
    if date.weekday() == Weekday::Sun {
        date += Duration::days(1);
    }
    date
}
