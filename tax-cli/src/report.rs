//! Plain-text rendering of bracket tables and estimates.

use tax_core::{Bracket, EstimateSummary, JurisdictionEstimate};

use crate::utils::{format_effective_rate, format_money, format_rate};

pub const RULE: &str = "========================================";

/// Title line, then one `rate  $low - $high` row per tier. The open-ended
/// tier prints as `$low+`.
pub fn bracket_table(
    title: &str,
    brackets: &[Bracket],
) -> String {
    let mut out = format!("{title}\n{:<20}{}\n", "Tax Rate", "Income Bracket");
    for bracket in brackets {
        let range = match bracket.high {
            Some(high) => format!("${} - ${high}", bracket.low),
            None => format!("${}+", bracket.low),
        };
        out.push_str(&format!("{:<20}{range}\n", format_rate(bracket.rate)));
    }
    out
}

fn summary_row(estimate: &JurisdictionEstimate) -> String {
    format!(
        "{:<15}{:<20}{:<15}{:<10}\n",
        estimate.label,
        format_money(estimate.taxable_income),
        format_money(estimate.tax),
        format_effective_rate(estimate.effective_rate),
    )
}

/// The closing SUMMARY block: Federal, the state when one was estimated,
/// then Total.
pub fn summary_table(summary: &EstimateSummary) -> String {
    let mut out = format!(
        "{RULE}\nSUMMARY: {}\n{:<15}{:<20}{:<15}{:<10}\n",
        summary.filing_status, "", "Taxable Income", "Taxes", "Effective Tax Rate"
    );
    out.push_str(&summary_row(&summary.federal));
    if let Some(state) = &summary.state {
        out.push_str(&summary_row(state));
    }
    out.push('\n');
    out.push_str(&summary_row(&summary.total()));
    out
}

/// One line per batch row.
pub fn batch_line(
    row: usize,
    summary: &EstimateSummary,
) -> String {
    let mut line = format!(
        "row {row}: {} income {} federal {} ({})",
        summary.filing_status.key(),
        format_money(summary.federal.taxable_income),
        format_money(summary.federal.tax),
        format_effective_rate(summary.federal.effective_rate),
    );
    if let Some(state) = &summary.state {
        line.push_str(&format!(
            " {} {} ({})",
            state.label,
            format_money(state.tax),
            format_effective_rate(state.effective_rate),
        ));
    }
    let total = summary.total();
    line.push_str(&format!(
        " total {} ({})",
        format_money(total.tax),
        format_effective_rate(total.effective_rate),
    ));
    line
}
