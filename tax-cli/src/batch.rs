//! CSV input for batch estimates.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Values are
//! trimmed.
//!
//! | Column           | Required | Type    | Notes                                        |
//! |------------------|----------|---------|----------------------------------------------|
//! | `filing_status`  | yes      | string  | `single`, `married`, `married_separately`, `head_of_household` or `1`-`4` |
//! | `taxable_income` | yes      | decimal | non-negative, e.g. `50000.00`                |
//! | `state`          | no       | string  | two-letter abbreviation; empty = federal only |
//!
//! ### Example
//!
//! ```csv
//! filing_status,taxable_income,state
//! single,50000.00,CA
//! married,120000,
//! ```
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::FilingStatus;
use tax_data::Jurisdiction;

#[derive(Debug, Deserialize)]
struct CsvRow {
    filing_status: String,
    taxable_income: Decimal,
    #[serde(default)]
    state: Option<String>,
}

/// One validated input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub filing_status: FilingStatus,
    pub taxable_income: Decimal,
    pub state: Option<Jurisdiction>,
}

/// Errors that can occur while reading batch input.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad structure, missing required column, or a type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("unrecognised filing status '{status}' on row {row}")]
    InvalidFilingStatus { status: String, row: usize },

    #[error("unknown state abbreviation '{state}' on row {row}")]
    UnknownState { state: String, row: usize },

    #[error("negative taxable income {income} on row {row}")]
    NegativeIncome { income: Decimal, row: usize },
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<BatchEntry, BatchError> {
    let filing_status = FilingStatus::parse(&row.filing_status).ok_or_else(|| {
        BatchError::InvalidFilingStatus {
            status: row.filing_status.clone(),
            row: row_number,
        }
    })?;

    if row.taxable_income < Decimal::ZERO {
        return Err(BatchError::NegativeIncome {
            income: row.taxable_income,
            row: row_number,
        });
    }

    let state = match row.state.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(abbr) => Some(Jurisdiction::state(abbr).ok_or_else(|| BatchError::UnknownState {
            state: abbr.to_string(),
            row: row_number,
        })?),
    };

    Ok(BatchEntry {
        row: row_number,
        filing_status,
        taxable_income: row.taxable_income,
        state,
    })
}

/// Parses CSV text into entries in file order.
///
/// # Errors
///
/// * [`BatchError::Parse`] when the CSV is structurally invalid or a
///   required field cannot be deserialised.
/// * [`BatchError::InvalidFilingStatus`], [`BatchError::UnknownState`] or
///   [`BatchError::NegativeIncome`] naming the first offending row.
pub fn load_from_str(input: &str) -> Result<Vec<BatchEntry>, BatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Reads a file from disk and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<BatchEntry>, BatchError> {
    let contents = std::fs::read_to_string(path).map_err(|source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}
