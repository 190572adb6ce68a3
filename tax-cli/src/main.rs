use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rust_decimal::Decimal;
use tax_core::FilingStatus;
use tax_data::Jurisdiction;
use tracing::debug;

use tax_cli::app::{self, Estimator, Preset};
use tax_cli::batch;
use tax_cli::config::{ConfigOverrides, EstimatorConfig};
use tax_cli::logging;
use tax_cli::prompt::Prompter;
use tax_cli::utils::parse_decimal;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive income tax estimator.
///
/// Loads federal (and optionally state) brackets for the year, from the
/// local cache or the taxee statistics repository, and estimates the tax
/// on a taxable income. Anything not given as a flag is asked for.
#[derive(Debug, Parser)]
#[command(name = "tax-estimator", version)]
struct Cli {
    /// Filing status: single, married, married_separately, head_of_household, or 1-4.
    #[arg(long, value_parser = parse_status)]
    status: Option<FilingStatus>,

    /// Taxable income, e.g. 50000 or "$50,000.00".
    #[arg(long, value_parser = parse_income)]
    income: Option<Decimal>,

    /// Also estimate this state's tax (two-letter abbreviation).
    #[arg(long, value_parser = parse_state, conflicts_with = "no_state")]
    state: Option<Jurisdiction>,

    /// Skip the state estimate without asking.
    #[arg(long, default_value_t = false)]
    no_state: bool,

    /// Tax year (defaults to the current year).
    #[arg(long)]
    year: Option<i32>,

    /// Bracket cache directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Use cached data only; never download.
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Estimate every row of a CSV file instead of prompting.
    #[arg(long, conflicts_with_all = ["status", "income", "state", "no_state"])]
    batch: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (e.g. "info", "tax_data=debug").
    #[arg(long)]
    log_level: Option<String>,

    /// Append log output to this file as well as stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_status(s: &str) -> Result<FilingStatus, String> {
    FilingStatus::parse(s).ok_or_else(|| format!("unknown filing status '{s}'"))
}

fn parse_income(s: &str) -> Result<Decimal, String> {
    let income = parse_decimal(s).map_err(|e| e.to_string())?;
    if income < Decimal::ZERO {
        return Err("taxable income cannot be negative".to_string());
    }
    Ok(income)
}

fn parse_state(s: &str) -> Result<Jurisdiction, String> {
    Jurisdiction::state(s).ok_or_else(|| format!("unknown state abbreviation '{s}'"))
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data_dir: self.data_dir.clone(),
            year: self.year,
            base_url: None,
            offline: self.offline,
            log_level: self.log_level.clone(),
        }
    }

    fn preset(&self) -> Preset {
        let state = match (self.state, self.no_state) {
            (Some(state), _) => Some(Some(state)),
            (None, true) => Some(None),
            (None, false) => None,
        };
        Preset {
            filing_status: self.status,
            taxable_income: self.income,
            state,
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = EstimatorConfig::load(cli.config.as_deref())?.apply(cli.overrides());
    logging::init_logging(&config.log_level, cli.log_file.as_deref())?;
    debug!(?config, "resolved configuration");

    let source = app::build_source(&config)?;
    let mut estimator = Estimator::new(source, config.year);

    if let Some(path) = &cli.batch {
        let entries = batch::load_from_file(path)
            .with_context(|| format!("Failed to load batch file: {}", path.display()))?;
        let mut out = io::stdout().lock();
        app::run_batch(&mut estimator, &entries, &mut out).await?;
        return Ok(());
    }

    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());
    app::run_interactive(&mut estimator, &mut prompter, cli.preset()).await?;

    Ok(())
}
