//! Estimator wiring: source construction, cached table loading, and the
//! interactive and batch runs.

use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tax_core::{BracketTable, EstimateSummary, FilingStatus, JurisdictionEstimate};
use tax_data::{BracketSource, CachedSource, FileCache, Jurisdiction, RemoteSource, load_bracket_table};
use tracing::{debug, info};

use crate::batch::BatchEntry;
use crate::config::EstimatorConfig;
use crate::prompt::Prompter;
use crate::report;
use crate::utils::format_money;

/// Cache-backed source, with a downloader unless running offline.
pub fn build_source(config: &EstimatorConfig) -> Result<CachedSource> {
    let cache = FileCache::new(&config.data_dir);
    if config.offline {
        debug!(dir = %config.data_dir.display(), "offline; cache only");
        return Ok(CachedSource::offline(cache));
    }
    let remote = RemoteSource::new(&config.base_url, config.timeout())
        .context("Failed to build HTTP client")?;
    Ok(CachedSource::new(cache, Some(remote)))
}

/// Loads bracket tables on demand and keeps them for the rest of the run.
pub struct Estimator<S> {
    source: S,
    year: i32,
    tables: HashMap<(Jurisdiction, FilingStatus), Arc<BracketTable>>,
}

impl<S: BracketSource> Estimator<S> {
    pub fn new(
        source: S,
        year: i32,
    ) -> Self {
        Self {
            source,
            year,
            tables: HashMap::new(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub async fn table(
        &mut self,
        jurisdiction: Jurisdiction,
        status: FilingStatus,
    ) -> Result<Arc<BracketTable>> {
        if let Some(table) = self.tables.get(&(jurisdiction, status)) {
            return Ok(Arc::clone(table));
        }

        let table = load_bracket_table(&self.source, self.year, jurisdiction, &[status])
            .await
            .with_context(|| {
                format!("Failed to load {} brackets for {}", jurisdiction, self.year)
            })?;
        let table = Arc::new(table);
        self.tables.insert((jurisdiction, status), Arc::clone(&table));
        Ok(table)
    }

    pub async fn jurisdiction_estimate(
        &mut self,
        jurisdiction: Jurisdiction,
        status: FilingStatus,
        income: Decimal,
    ) -> Result<JurisdictionEstimate> {
        let table = self.table(jurisdiction, status).await?;
        let estimate = JurisdictionEstimate::calculate(jurisdiction.label(), &table, status, income)
            .with_context(|| format!("Failed to estimate {jurisdiction} tax"))?;
        info!(%jurisdiction, status = status.key(), %income, tax = %estimate.tax, "estimated");
        Ok(estimate)
    }

    pub async fn estimate(
        &mut self,
        status: FilingStatus,
        income: Decimal,
        state: Option<Jurisdiction>,
    ) -> Result<EstimateSummary> {
        let federal = self
            .jurisdiction_estimate(Jurisdiction::Federal, status, income)
            .await?;
        let state = match state {
            Some(state) => Some(self.jurisdiction_estimate(state, status, income).await?),
            None => None,
        };
        Ok(EstimateSummary {
            filing_status: status,
            federal,
            state,
        })
    }
}

/// Answers supplied on the command line; anything missing is prompted for.
#[derive(Debug, Clone, Default)]
pub struct Preset {
    pub filing_status: Option<FilingStatus>,
    pub taxable_income: Option<Decimal>,
    /// `Some(None)` means "no state" was chosen up front.
    pub state: Option<Option<Jurisdiction>>,
}

fn bracket_title(
    jurisdiction: Jurisdiction,
    status: FilingStatus,
) -> String {
    match jurisdiction {
        Jurisdiction::Federal => format!("Federal Tax Brackets for {status} filing status"),
        Jurisdiction::State(info) => {
            format!("{} Tax Brackets for {status} filing status", info.name)
        }
    }
}

async fn show_jurisdiction<S, R, W>(
    estimator: &mut Estimator<S>,
    prompter: &mut Prompter<R, W>,
    jurisdiction: Jurisdiction,
    status: FilingStatus,
    income: Decimal,
) -> Result<JurisdictionEstimate>
where
    S: BracketSource,
    R: BufRead,
    W: Write,
{
    let year = estimator.year();
    writeln!(
        prompter.output(),
        "Loading {jurisdiction} tax brackets for {year}."
    )?;
    let table = estimator.table(jurisdiction, status).await?;

    if let Some(brackets) = table.brackets(status) {
        write!(
            prompter.output(),
            "{}",
            report::bracket_table(&bracket_title(jurisdiction, status), brackets)
        )?;
    }

    let estimate = estimator
        .jurisdiction_estimate(jurisdiction, status, income)
        .await?;
    writeln!(
        prompter.output(),
        "Your estimated {} taxes are: {}",
        match jurisdiction {
            Jurisdiction::Federal => "federal".to_string(),
            Jurisdiction::State(info) => format!("{} state", info.abbreviation),
        },
        format_money(estimate.tax)
    )?;
    writeln!(prompter.output())?;
    Ok(estimate)
}

/// Walks through one estimate, prompting for whatever `preset` leaves out.
pub async fn run_interactive<S, R, W>(
    estimator: &mut Estimator<S>,
    prompter: &mut Prompter<R, W>,
    preset: Preset,
) -> Result<EstimateSummary>
where
    S: BracketSource,
    R: BufRead,
    W: Write,
{
    writeln!(prompter.output(), "Welcome to the tax estimator!")?;

    let status = match preset.filing_status {
        Some(status) => status,
        None => prompter.filing_status()?,
    };
    writeln!(prompter.output(), "Filing Status: {status}")?;

    let income = match preset.taxable_income {
        Some(income) => income,
        None => prompter.taxable_income()?,
    };

    let federal =
        show_jurisdiction(estimator, prompter, Jurisdiction::Federal, status, income).await?;

    let state = match preset.state {
        Some(choice) => choice,
        None => {
            if prompter.confirm("Would you also like to estimate your state taxes")? {
                Some(prompter.state()?)
            } else {
                None
            }
        }
    };

    let state = match state {
        Some(state) => Some(show_jurisdiction(estimator, prompter, state, status, income).await?),
        None => None,
    };

    let summary = EstimateSummary {
        filing_status: status,
        federal,
        state,
    };
    write!(prompter.output(), "{}", report::summary_table(&summary))?;
    Ok(summary)
}

/// Estimates every entry in order, writing one line each. Stops at the
/// first row that cannot be estimated.
pub async fn run_batch<S, W>(
    estimator: &mut Estimator<S>,
    entries: &[BatchEntry],
    out: &mut W,
) -> Result<Vec<EstimateSummary>>
where
    S: BracketSource,
    W: Write,
{
    let mut summaries = Vec::with_capacity(entries.len());
    for entry in entries {
        let summary = estimator
            .estimate(entry.filing_status, entry.taxable_income, entry.state)
            .await
            .with_context(|| format!("row {}", entry.row))?;
        writeln!(out, "{}", report::batch_line(entry.row, &summary))?;
        summaries.push(summary);
    }
    info!(rows = summaries.len(), "batch complete");
    Ok(summaries)
}
