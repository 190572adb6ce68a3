use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::{compute_tax, effective_rate};
use crate::error::TaxError;
use crate::models::{BracketTable, FilingStatus};

/// Tax owed to one jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionEstimate {
    pub label: String,
    pub taxable_income: Decimal,
    pub tax: Decimal,
    /// `None` when taxable income is zero.
    pub effective_rate: Option<Decimal>,
}

impl JurisdictionEstimate {
    /// Runs the calculator against `table` and records the result under
    /// `label`.
    ///
    /// # Errors
    ///
    /// Any error from [`compute_tax`].
    pub fn calculate(
        label: impl Into<String>,
        table: &BracketTable,
        status: FilingStatus,
        taxable_income: Decimal,
    ) -> Result<Self, TaxError> {
        let tax = compute_tax(table, status, taxable_income)?;
        Ok(Self::from_tax(label, taxable_income, tax))
    }

    fn from_tax(
        label: impl Into<String>,
        taxable_income: Decimal,
        tax: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            taxable_income,
            tax,
            effective_rate: effective_rate(tax, taxable_income).ok(),
        }
    }
}

/// Federal estimate plus an optional state estimate for the same income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateSummary {
    pub filing_status: FilingStatus,
    pub federal: JurisdictionEstimate,
    pub state: Option<JurisdictionEstimate>,
}

impl EstimateSummary {
    /// Combined federal and state liability.
    pub fn total(&self) -> JurisdictionEstimate {
        let state_tax = self.state.as_ref().map_or(Decimal::ZERO, |s| s.tax);
        JurisdictionEstimate::from_tax(
            "Total",
            self.federal.taxable_income,
            self.federal.tax + state_tax,
        )
    }
}
