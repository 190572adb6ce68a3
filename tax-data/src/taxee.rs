//! Adapter for the taxee-tax-statistics JSON schema.
//!
//! ## Layout
//!
//! | file          | path to the per-status objects                          |
//! |---------------|---------------------------------------------------------|
//! | `federal.json`| `tax_withholding_percentage_method_tables.annual`       |
//! | `<state>.json`| document root                                           |
//!
//! Each per-status object carries an `income_tax_brackets` array of
//! `{ "bracket": <integer>, "marginal_rate": <number> }` entries, where
//! `bracket` is the income at which the tier *starts*. The core expects the
//! income at which each tier *ends*, so entry `i` is emitted with the start of
//! entry `i + 1` as its boundary. A status declared with `"type": "none"` (or
//! `null`) and no array is a jurisdiction without income tax and becomes a
//! single 0% tier.
//!
//! ### Example
//!
//! ```json
//! {
//!   "single": {
//!     "type": "graduated",
//!     "income_tax_brackets": [
//!       { "bracket": 0, "marginal_rate": 1 },
//!       { "bracket": 8544, "marginal_rate": 2 },
//!       { "bracket": 20255, "marginal_rate": 4 }
//!     ]
//!   }
//! }
//! ```

use serde_json::{Map, Value};
use tax_core::{FilingStatus, RawBracket, RawBracketSource, RawRate, TaxError};
use tracing::debug;

use crate::error::TaxDataError;
use crate::states::Jurisdiction;

const FEDERAL_SECTION: &str = "/tax_withholding_percentage_method_tables/annual";

/// Parses a federal data file into raw per-status records.
pub fn parse_federal(json: &str) -> Result<RawBracketSource, TaxDataError> {
    let root: Value = serde_json::from_str(json)?;
    let statuses = root
        .pointer(FEDERAL_SECTION)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            TaxDataError::MissingSection("tax_withholding_percentage_method_tables.annual".into())
        })?;

    Ok(parse_statuses(statuses)?)
}

/// Parses a state data file into raw per-status records.
pub fn parse_state(json: &str) -> Result<RawBracketSource, TaxDataError> {
    let root: Value = serde_json::from_str(json)?;
    let statuses = root
        .as_object()
        .ok_or_else(|| TaxDataError::MissingSection("<root object>".into()))?;

    Ok(parse_statuses(statuses)?)
}

/// Parses `json` with the layout that `jurisdiction`'s file uses.
pub fn parse_for(
    jurisdiction: Jurisdiction,
    json: &str,
) -> Result<RawBracketSource, TaxDataError> {
    match jurisdiction {
        Jurisdiction::Federal => parse_federal(json),
        Jurisdiction::State(_) => parse_state(json),
    }
}

fn parse_statuses(statuses: &Map<String, Value>) -> Result<RawBracketSource, TaxError> {
    let mut source = RawBracketSource::new();

    for (key, entry) in statuses {
        if FilingStatus::parse_key(key).is_none() {
            debug!(key = %key, "ignoring non-status section");
            continue;
        }
        source.insert(key.clone(), parse_status(key, entry)?);
    }

    Ok(source)
}

fn parse_status(
    key: &str,
    entry: &Value,
) -> Result<Vec<RawBracket>, TaxError> {
    match entry.get("income_tax_brackets") {
        Some(Value::Array(items)) => parse_brackets(key, items),
        None | Some(Value::Null) if declares_no_income_tax(entry) => {
            debug!(status = key, "no income tax; using a single 0% tier");
            Ok(vec![RawBracket::new(0, 0)])
        }
        _ => Err(TaxError::malformed(
            key,
            0,
            "missing 'income_tax_brackets' array",
        )),
    }
}

fn declares_no_income_tax(entry: &Value) -> bool {
    match entry.get("type") {
        Some(Value::Null) => true,
        Some(Value::String(kind)) => kind.eq_ignore_ascii_case("none"),
        _ => false,
    }
}

fn parse_brackets(
    key: &str,
    items: &[Value],
) -> Result<Vec<RawBracket>, TaxError> {
    let mut starts = Vec::with_capacity(items.len());
    let mut rates = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        starts.push(parse_start(key, index, item)?);
        rates.push(parse_rate(key, index, item)?);
    }

    // A tier ends where the next one starts; the last tier's boundary is unused.
    let boundaries = starts.iter().skip(1).copied().chain(std::iter::once(0));

    Ok(boundaries
        .zip(rates)
        .map(|(boundary, rate)| RawBracket { boundary, rate })
        .collect())
}

fn parse_start(
    key: &str,
    index: usize,
    item: &Value,
) -> Result<u64, TaxError> {
    let value = item
        .get("bracket")
        .ok_or_else(|| TaxError::malformed(key, index, "missing 'bracket'"))?;

    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    // Some files write whole-number thresholds as floats (e.g. 8544.0).
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
        _ => Err(TaxError::malformed(
            key,
            index,
            format!("'bracket' must be a non-negative integer, got {value}"),
        )),
    }
}

fn parse_rate(
    key: &str,
    index: usize,
    item: &Value,
) -> Result<RawRate, TaxError> {
    let value = item
        .get("marginal_rate")
        .ok_or_else(|| TaxError::malformed(key, index, "missing 'marginal_rate'"))?;

    if let Some(n) = value.as_i64() {
        return Ok(RawRate::Integer(n));
    }
    value.as_f64().map(RawRate::Float).ok_or_else(|| {
        TaxError::malformed(
            key,
            index,
            format!("'marginal_rate' must be a number, got {value}"),
        )
    })
}
