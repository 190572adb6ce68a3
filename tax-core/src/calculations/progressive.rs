//! Marginal-rate accumulation over a normalized bracket list.
//!
//! Brackets are walked in ascending order. Each tier answers two separate
//! questions: does the income run past this tier's upper bound, and is this
//! the tier that holds the last unit of income?
//!
//! | case                                   | contribution                        | then     |
//! |----------------------------------------|-------------------------------------|----------|
//! | bounded tier, income > `high`          | `rate/100 × (high − low)`           | continue |
//! | tier holding the income (or unbounded) | `rate/100 × max(income − low, 0)`   | stop     |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{BracketTable, FilingStatus, RawBracket, RawBracketSource, compute_tax};
//!
//! let mut source = RawBracketSource::new();
//! source.insert(
//!     "single".to_string(),
//!     vec![
//!         RawBracket::new(9700, 10),
//!         RawBracket::new(39475, 12),
//!         RawBracket::new(0, 22),
//!     ],
//! );
//! let table = BracketTable::from_raw_for(&source, &[FilingStatus::Single]).unwrap();
//!
//! let tax = compute_tax(&table, FilingStatus::Single, dec!(50000)).unwrap();
//!
//! // 970 + 0.12 × (39475 − 9701) + 0.22 × (50000 − 39476)
//! assert_eq!(tax, dec!(6858.16));
//! ```

use rust_decimal::Decimal;
use tracing::trace;

use crate::calculations::common::non_negative;
use crate::error::TaxError;
use crate::models::{Bracket, BracketTable, FilingStatus};

/// Computes the tax owed on `taxable_income` under `status`'s brackets.
///
/// The result is unrounded; callers round for display.
///
/// # Errors
///
/// * [`TaxError::UnknownFilingStatus`] if the table was built without `status`.
/// * [`TaxError::NegativeIncome`] if `taxable_income` is below zero.
pub fn compute_tax(
    table: &BracketTable,
    status: FilingStatus,
    taxable_income: Decimal,
) -> Result<Decimal, TaxError> {
    let brackets = table
        .brackets(status)
        .ok_or(TaxError::UnknownFilingStatus(status))?;

    tax_for_brackets(brackets, taxable_income)
}

/// Computes the tax owed on `taxable_income` for one ordered bracket list.
///
/// # Errors
///
/// Returns [`TaxError::NegativeIncome`] if `taxable_income` is below zero.
pub fn tax_for_brackets(
    brackets: &[Bracket],
    taxable_income: Decimal,
) -> Result<Decimal, TaxError> {
    if taxable_income < Decimal::ZERO {
        return Err(TaxError::NegativeIncome(taxable_income));
    }

    let mut tax = Decimal::ZERO;

    for bracket in brackets {
        let low = Decimal::from(bracket.low);

        match bracket.high.map(Decimal::from) {
            Some(high) if taxable_income > high => {
                let contribution = bracket.rate_fraction() * (high - low);
                trace!(low = bracket.low, %contribution, "full tier");
                tax += contribution;
            }
            _ => {
                let contribution = bracket.rate_fraction() * non_negative(taxable_income - low);
                trace!(low = bracket.low, %contribution, "final tier");
                tax += contribution;
                break;
            }
        }
    }

    Ok(tax)
}

/// Tax as a percentage of taxable income.
///
/// # Errors
///
/// Returns [`TaxError::UndefinedEffectiveRate`] when `taxable_income` is zero.
pub fn effective_rate(
    tax: Decimal,
    taxable_income: Decimal,
) -> Result<Decimal, TaxError> {
    if taxable_income.is_zero() {
        return Err(TaxError::UndefinedEffectiveRate);
    }

    Ok(tax / taxable_income * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{RawBracket, RawBracketSource};

    fn example_brackets() -> Vec<Bracket> {
        vec![
            Bracket {
                low: 0,
                high: Some(9700),
                rate: dec!(10),
            },
            Bracket {
                low: 9701,
                high: Some(39475),
                rate: dec!(12),
            },
            Bracket {
                low: 39476,
                high: None,
                rate: dec!(22),
            },
        ]
    }

    fn single_only_table() -> BracketTable {
        let mut source = RawBracketSource::new();
        source.insert(
            "single".to_string(),
            vec![
                RawBracket::new(9700, 10),
                RawBracket::new(39475, 12),
                RawBracket::new(0, 22),
            ],
        );
        BracketTable::from_raw_for(&source, &[FilingStatus::Single]).unwrap()
    }

    // =========================================================================
    // tax_for_brackets tests
    // =========================================================================

    #[test]
    fn zero_income_owes_nothing() {
        let result = tax_for_brackets(&example_brackets(), dec!(0));

        assert_eq!(result, Ok(dec!(0)));
    }

    #[test]
    fn income_at_first_boundary_uses_first_tier_only() {
        let result = tax_for_brackets(&example_brackets(), dec!(9700));

        assert_eq!(result, Ok(dec!(970.0)));
    }

    #[test]
    fn income_one_past_boundary_adds_nothing_yet() {
        let result = tax_for_brackets(&example_brackets(), dec!(9701));

        // Second tier starts at 9701, so no units are above its low yet.
        assert_eq!(result, Ok(dec!(970)));
    }

    #[test]
    fn income_in_middle_tier() {
        let result = tax_for_brackets(&example_brackets(), dec!(20000));

        // 970 + 0.12 × (20000 − 9701) = 970 + 1235.88
        assert_eq!(result, Ok(dec!(2205.88)));
    }

    #[test]
    fn income_in_unbounded_tier() {
        let result = tax_for_brackets(&example_brackets(), dec!(50000));

        // 970 + 0.12 × 29774 + 0.22 × 10524 = 970 + 3572.88 + 2315.28
        assert_eq!(result, Ok(dec!(6858.16)));
    }

    #[test]
    fn fractional_income_between_tiers_never_goes_negative() {
        let result = tax_for_brackets(&example_brackets(), dec!(9700.5));

        assert_eq!(result, Ok(dec!(970)));
    }

    #[test]
    fn fractional_income_inside_tier() {
        let result = tax_for_brackets(&example_brackets(), dec!(100.50));

        assert_eq!(result, Ok(dec!(10.05)));
    }

    #[test]
    fn single_unbounded_tier_is_a_flat_tax() {
        let brackets = [Bracket {
            low: 0,
            high: None,
            rate: dec!(4.95),
        }];

        let result = tax_for_brackets(&brackets, dec!(10000));

        assert_eq!(result, Ok(dec!(495)));
    }

    #[test]
    fn zero_width_first_tier_is_not_mistaken_for_unbounded() {
        let brackets = [
            Bracket {
                low: 0,
                high: Some(0),
                rate: dec!(50),
            },
            Bracket {
                low: 1,
                high: None,
                rate: dec!(10),
            },
        ];

        let result = tax_for_brackets(&brackets, dec!(101));

        assert_eq!(result, Ok(dec!(10)));
    }

    #[test]
    fn negative_income_is_rejected() {
        let result = tax_for_brackets(&example_brackets(), dec!(-1));

        assert_eq!(result, Err(TaxError::NegativeIncome(dec!(-1))));
    }

    #[test]
    fn empty_bracket_list_owes_nothing() {
        let result = tax_for_brackets(&[], dec!(5000));

        assert_eq!(result, Ok(dec!(0)));
    }

    // =========================================================================
    // compute_tax tests
    // =========================================================================

    #[test]
    fn compute_tax_uses_table_for_status() {
        let table = single_only_table();

        let result = compute_tax(&table, FilingStatus::Single, dec!(50000));

        assert_eq!(result, Ok(dec!(6858.16)));
    }

    #[test]
    fn compute_tax_reports_unknown_status() {
        let table = single_only_table();

        let result = compute_tax(&table, FilingStatus::MarriedJoint, dec!(50000));

        assert_eq!(
            result,
            Err(TaxError::UnknownFilingStatus(FilingStatus::MarriedJoint))
        );
    }

    #[test]
    fn compute_tax_is_repeatable() {
        let table = single_only_table();

        let first = compute_tax(&table, FilingStatus::Single, dec!(43210.55));
        let second = compute_tax(&table, FilingStatus::Single, dec!(43210.55));

        assert_eq!(first, second);
    }

    // =========================================================================
    // effective_rate tests
    // =========================================================================

    #[test]
    fn effective_rate_is_percentage_of_income() {
        let result = effective_rate(dec!(6858.16), dec!(50000));

        assert_eq!(result, Ok(dec!(13.71632)));
    }

    #[test]
    fn effective_rate_of_zero_income_is_undefined() {
        let result = effective_rate(dec!(0), dec!(0));

        assert_eq!(result, Err(TaxError::UndefinedEffectiveRate));
    }
}
