//! Bracket normalization.
//!
//! Raw sources list tiers in ascending order, each record carrying the last
//! income unit of its tier. Normalization turns that list into inclusive
//! `low..=high` tiers:
//!
//! | record | `low`                      | `high`               |
//! |--------|----------------------------|----------------------|
//! | first  | `0`                        | its own boundary     |
//! | middle | previous boundary + 1      | its own boundary     |
//! | last   | previous boundary + 1      | `None` (unbounded)   |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{Bracket, FilingStatus, RawBracket, loader::normalize};
//!
//! let raw = [
//!     RawBracket::new(9700, 10),
//!     RawBracket::new(39475, 12),
//!     RawBracket::new(0, 22),
//! ];
//!
//! let brackets = normalize(FilingStatus::Single, &raw).unwrap();
//!
//! assert_eq!(brackets[1], Bracket { low: 9701, high: Some(39475), rate: dec!(12) });
//! assert_eq!(brackets[2], Bracket { low: 39476, high: None, rate: dec!(22) });
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::TaxError;
use crate::models::{Bracket, BracketTable, FilingStatus, RawBracket, RawBracketSource, RawRate};

/// Normalizes one filing status's raw tiers into contiguous brackets.
///
/// The input must already be ascending; it is never reordered. Records that
/// would break contiguity are rejected instead of being repaired.
///
/// # Errors
///
/// * [`TaxError::EmptyBracketTable`] when `raw` is empty.
/// * [`TaxError::MalformedRawRecord`] when a boundary does not ascend, a
///   boundary cannot be followed by another tier, or a rate is unusable.
pub fn normalize(
    status: FilingStatus,
    raw: &[RawBracket],
) -> Result<Vec<Bracket>, TaxError> {
    let Some(last) = raw.len().checked_sub(1) else {
        return Err(TaxError::EmptyBracketTable(status));
    };

    let mut brackets = Vec::with_capacity(raw.len());
    let mut low = 0u64;

    for (index, record) in raw.iter().enumerate() {
        let rate = coerce_rate(status, index, record.rate)?;

        let high = if index == last {
            None
        } else {
            if record.boundary < low {
                return Err(TaxError::malformed(
                    status.key(),
                    index,
                    format!(
                        "boundary {} is below the tier start {low}; records must ascend",
                        record.boundary
                    ),
                ));
            }
            Some(record.boundary)
        };

        brackets.push(Bracket { low, high, rate });

        if let Some(high) = high {
            low = high.checked_add(1).ok_or_else(|| {
                TaxError::malformed(status.key(), index, "boundary leaves no room for the next tier")
            })?;
        }
    }

    debug!(status = status.key(), tiers = brackets.len(), "normalized brackets");
    Ok(brackets)
}

fn coerce_rate(
    status: FilingStatus,
    index: usize,
    rate: RawRate,
) -> Result<Decimal, TaxError> {
    let value = rate.to_decimal().ok_or_else(|| {
        TaxError::malformed(status.key(), index, format!("rate {rate:?} is not a finite number"))
    })?;

    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(TaxError::malformed(
            status.key(),
            index,
            format!("rate {value} is outside 0-100"),
        ));
    }

    Ok(value)
}

impl BracketTable {
    /// Builds a table from every filing status in `source`. All four statuses
    /// must be present.
    ///
    /// # Errors
    ///
    /// * [`TaxError::MissingFilingStatus`] for the first absent status.
    /// * Any error from [`normalize`].
    pub fn from_raw(source: &RawBracketSource) -> Result<Self, TaxError> {
        Self::build(source, &FilingStatus::ALL, true)
    }

    /// Builds a table holding only `statuses`. Other statuses in `source` are
    /// left out, so a problem in data the caller does not need cannot fail
    /// the build.
    ///
    /// # Errors
    ///
    /// Same as [`BracketTable::from_raw`], restricted to `statuses`.
    pub fn from_raw_for(
        source: &RawBracketSource,
        statuses: &[FilingStatus],
    ) -> Result<Self, TaxError> {
        Self::build(source, statuses, false)
    }

    fn build(
        source: &RawBracketSource,
        required: &[FilingStatus],
        include_all_present: bool,
    ) -> Result<Self, TaxError> {
        if let Some(missing) = required.iter().find(|s| !source.contains_key(s.key())) {
            return Err(TaxError::MissingFilingStatus(*missing));
        }

        for key in source.keys() {
            if FilingStatus::parse_key(key).is_none() {
                debug!(key = %key, "skipping unrecognised filing status key");
            }
        }

        let mut tables = BTreeMap::new();
        for status in FilingStatus::ALL {
            if !include_all_present && !required.contains(&status) {
                continue;
            }
            if let Some(raw) = source.get(status.key()) {
                tables.insert(status, normalize(status, raw)?);
            }
        }

        Ok(Self::from_map(tables))
    }
}
