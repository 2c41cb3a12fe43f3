use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary amount to two decimal places.
///
/// All amounts are in a single currency; midpoints round away from zero
/// so that half-paise results never round down against the buyer.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
