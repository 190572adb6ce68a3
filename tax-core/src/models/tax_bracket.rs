use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal tier of a normalized bracket table.
///
/// `low` and `high` are inclusive. `high` is `None` only for the top tier,
/// which has no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub low: u64,
    pub high: Option<u64>,
    /// Marginal rate as a percentage (e.g. `22` for 22%).
    pub rate: Decimal,
}

impl Bracket {
    pub fn is_unbounded(&self) -> bool {
        self.high.is_none()
    }

    /// The rate as a fraction of one (e.g. `0.22`).
    pub fn rate_fraction(&self) -> Decimal {
        self.rate / Decimal::ONE_HUNDRED
    }
}

/// Marginal rate as it appears in raw source data, which mixes integral and
/// fractional numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRate {
    Integer(i64),
    Float(f64),
}

impl RawRate {
    /// Coerces the raw value to a `Decimal`. Returns `None` for values that
    /// have no decimal representation (NaN, infinities, out of range).
    ///
    /// Floats go through their shortest round-trip text form so `5.1` becomes
    /// exactly `5.1` rather than its binary approximation.
    pub fn to_decimal(self) -> Option<Decimal> {
        match self {
            Self::Integer(n) => Some(Decimal::from(n)),
            Self::Float(f) => f.to_string().parse().ok(),
        }
    }
}

impl From<i64> for RawRate {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for RawRate {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for RawRate {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

/// A raw tier record: `boundary` is the last income unit of the tier, so the
/// next tier starts at `boundary + 1`. The boundary of the final record is
/// ignored because the top tier is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBracket {
    pub boundary: u64,
    pub rate: RawRate,
}

impl RawBracket {
    pub fn new(
        boundary: u64,
        rate: impl Into<RawRate>,
    ) -> Self {
        Self {
            boundary,
            rate: rate.into(),
        }
    }
}
