use bazaar_catalog::StoreFeeConfig;
use bazaar_shared::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::PaymentMethod;

/// Itemized price breakdown for one purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub store_charges: Decimal,
    pub gst_amount: Decimal,
    pub cod_charges: Decimal,
    pub final_total: Decimal,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),

    #[error("invalid unit price: {0}")]
    InvalidPrice(Decimal),
}

fn default_gst_percentage() -> Decimal {
    Decimal::from(18)
}

/// Compute the breakdown for `quantity` units at `unit_price` under the
/// store's fee configuration.
///
/// Pure: the same inputs always produce the same breakdown, so the
/// checkout preview and the persisted order price agree exactly.
///
/// GST applies to the subtotal only; the flat store and COD charges are
/// untaxed. That mirrors how sellers configured their fees on the platform
/// and must not be "fixed" here.
pub fn price_order(
    unit_price: Decimal,
    quantity: u32,
    fees: &StoreFeeConfig,
    payment_method: PaymentMethod,
) -> Result<PriceBreakdown, PricingError> {
    if quantity == 0 {
        return Err(PricingError::InvalidQuantity(quantity));
    }
    if unit_price < Decimal::ZERO {
        return Err(PricingError::InvalidPrice(unit_price));
    }

    let subtotal = round_money(unit_price * Decimal::from(quantity));
    let store_charges = fees.store_charges.unwrap_or(Decimal::ZERO);

    let gst_amount = if fees.gst_applicable {
        let percentage = fees.gst_percentage.unwrap_or_else(default_gst_percentage);
        round_money(subtotal * percentage / Decimal::from(100))
    } else {
        Decimal::ZERO
    };

    let cod_charges = match payment_method {
        PaymentMethod::Cod => fees.cod_charges.unwrap_or(Decimal::ZERO),
        PaymentMethod::Online => Decimal::ZERO,
    };

    Ok(PriceBreakdown {
        subtotal,
        store_charges,
        gst_amount,
        cod_charges,
        final_total: subtotal + store_charges + gst_amount + cod_charges,
    })
}
