use rust_decimal::Decimal;
use tax_core::calculations::common::round_cents;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("an amount is required")]
    Empty,

    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
}

/// Trims whitespace and drops a leading `$` and comma thousands separators.
fn normalize_amount_input(s: &str) -> String {
    s.trim().trim_start_matches('$').replace(',', "")
}

/// Parses a user-entered amount into a [`Decimal`].
///
/// Handles `$` and comma thousands separators (e.g. `"$1,234.56"`).
/// Empty or whitespace-only input is an error, not zero.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Err(ParseDecimalError::Empty);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })
}

/// `$1234.50`: rounded to cents, always two decimals.
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", round_cents(amount))
}

/// Marginal rate as stored, without trailing zeros: `22%`, `9.3%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", rate.normalize())
}

/// Effective rate with two decimals, or `n/a` when undefined.
pub fn format_effective_rate(rate: Option<Decimal>) -> String {
    match rate {
        Some(rate) => format!("{:.2}%", round_cents(rate)),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_accepts_dollar_sign() {
        assert_eq!(parse_decimal(" $85,000 ").unwrap(), dec!(85000));
    }

    #[test]
    fn parse_decimal_rejects_empty_input() {
        assert!(matches!(parse_decimal(""), Err(ParseDecimalError::Empty)));
        assert!(matches!(parse_decimal("   "), Err(ParseDecimalError::Empty)));
        assert!(matches!(parse_decimal(" $ "), Err(ParseDecimalError::Empty)));
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert!(parse_decimal("abc").is_err());
    }

    #[test]
    fn money_always_has_two_decimals() {
        assert_eq!(format_money(dec!(970)), "$970.00");
        assert_eq!(format_money(dec!(6858.16)), "$6858.16");
        assert_eq!(format_money(dec!(0.005)), "$0.01");
    }

    #[test]
    fn rates_drop_trailing_zeros() {
        assert_eq!(format_rate(dec!(22)), "22%");
        assert_eq!(format_rate(dec!(9.30)), "9.3%");
        assert_eq!(format_rate(dec!(0)), "0%");
    }

    #[test]
    fn effective_rate_renders_missing_as_na() {
        assert_eq!(format_effective_rate(Some(dec!(13.71632))), "13.72%");
        assert_eq!(format_effective_rate(Some(dec!(10))), "10.00%");
        assert_eq!(format_effective_rate(None), "n/a");
    }
}
