use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::FilingStatus;

/// Errors produced by bracket normalization and tax calculation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxError {
    /// The raw source has no bracket list for a required filing status.
    #[error("no bracket data for filing status '{}'", .0.key())]
    MissingFilingStatus(FilingStatus),

    /// The raw source has a bracket list for the status, but it is empty.
    #[error("bracket list for filing status '{}' is empty", .0.key())]
    EmptyBracketTable(FilingStatus),

    /// A bracket table was queried for a status it was not built with.
    #[error("bracket table has no entry for filing status '{}'", .0.key())]
    UnknownFilingStatus(FilingStatus),

    /// The effective rate of a zero income has no meaning.
    #[error("effective rate is undefined for zero taxable income")]
    UndefinedEffectiveRate,

    /// A raw tier record is missing a field or carries an unusable value.
    #[error("malformed bracket record {index} in '{context}': {reason}")]
    MalformedRawRecord {
        context: String,
        index: usize,
        reason: String,
    },

    #[error("taxable income must not be negative (got {0})")]
    NegativeIncome(Decimal),
}

impl TaxError {
    pub fn malformed(
        context: impl Into<String>,
        index: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedRawRecord {
            context: context.into(),
            index,
            reason: reason.into(),
        }
    }
}
