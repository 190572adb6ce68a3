//! Shared numeric helpers for tax amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to whole cents, midpoints away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_cents;
///
/// assert_eq!(round_cents(dec!(2315.275)), dec!(2315.28));
/// assert_eq!(round_cents(dec!(6858.164)), dec!(6858.16));
/// ```
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `value`, or zero when it is negative.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
