//! End-to-end runs of the estimator against the on-disk 2019 fixtures.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_cli::app::{Estimator, Preset, run_batch, run_interactive};
use tax_cli::batch;
use tax_cli::config::EstimatorConfig;
use tax_cli::prompt::Prompter;
use tax_core::FilingStatus;
use tax_data::{BracketSource, CachedSource, FileCache, Jurisdiction, TaxDataError};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn offline_estimator(year: i32) -> Estimator<CachedSource> {
    Estimator::new(CachedSource::offline(FileCache::new(fixtures())), year)
}

/// Counts how often the underlying cache is read.
struct Counting {
    inner: FileCache,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl BracketSource for Counting {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn fetch(
        &self,
        year: i32,
        jurisdiction: Jurisdiction,
    ) -> Result<String, TaxDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(year, jurisdiction).await
    }
}

// =============================================================================
// Interactive flow
// =============================================================================

#[tokio::test]
async fn interactive_federal_and_state() {
    let mut estimator = offline_estimator(2019);
    let mut prompter = Prompter::new("1\n50000\ny\nca\n".as_bytes(), Vec::new());

    let summary = run_interactive(&mut estimator, &mut prompter, Preset::default())
        .await
        .expect("estimate should succeed");

    assert_eq!(summary.filing_status, FilingStatus::Single);
    assert_eq!(summary.federal.tax, dec!(6858.16));
    let state = summary.state.as_ref().expect("state was requested");
    assert_eq!(state.label, "CA");
    assert_eq!(state.tax, dec!(1982.34));
    assert_eq!(summary.total().tax, dec!(8840.50));

    let out = String::from_utf8(prompter.output().clone()).unwrap();
    assert!(out.contains("Federal Tax Brackets for Single filing status"));
    assert!(out.contains("12%                 $9701 - $39475"));
    assert!(out.contains("37%                 $510301+"));
    assert!(out.contains("California Tax Brackets for Single filing status"));
    assert!(out.contains("9.3%                $56086 - $286492"));
    assert!(out.contains("Your estimated federal taxes are: $6858.16"));
    assert!(out.contains("Your estimated CA state taxes are: $1982.34"));
    assert!(out.contains("SUMMARY: Single"));
}

#[tokio::test]
async fn interactive_declining_state() {
    let mut estimator = offline_estimator(2019);
    let mut prompter = Prompter::new("married\n$120,000\nn\n".as_bytes(), Vec::new());

    let summary = run_interactive(&mut estimator, &mut prompter, Preset::default())
        .await
        .unwrap();

    assert_eq!(summary.federal.tax, dec!(18116.66));
    assert!(summary.state.is_none());
}

#[tokio::test]
async fn preset_answers_skip_prompts() {
    let mut estimator = offline_estimator(2019);
    // No input at all: any prompt would fail with a closed stream.
    let mut prompter = Prompter::new("".as_bytes(), Vec::new());
    let preset = Preset {
        filing_status: Some(FilingStatus::HeadOfHousehold),
        taxable_income: Some(dec!(9700)),
        state: Some(Jurisdiction::state("TX")),
    };

    let summary = run_interactive(&mut estimator, &mut prompter, preset)
        .await
        .expect("presets should cover every question");

    assert_eq!(summary.federal.tax, dec!(970.00));
    assert_eq!(summary.state.unwrap().tax, dec!(0));
}

#[tokio::test]
async fn zero_income_reports_na_rate() {
    let mut estimator = offline_estimator(2019);
    let mut prompter = Prompter::new("".as_bytes(), Vec::new());
    let preset = Preset {
        filing_status: Some(FilingStatus::Single),
        taxable_income: Some(dec!(0)),
        state: Some(None),
    };

    let summary = run_interactive(&mut estimator, &mut prompter, preset)
        .await
        .unwrap();

    assert_eq!(summary.federal.effective_rate, None);
    let out = String::from_utf8(prompter.output().clone()).unwrap();
    assert!(out.contains("n/a"));
}

#[tokio::test]
async fn missing_year_fails_offline() {
    let mut estimator = offline_estimator(1990);

    let result = estimator
        .estimate(FilingStatus::Single, dec!(1000), None)
        .await;

    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("1990"), "got {message}");
    assert!(message.contains("offline"), "got {message}");
}

// =============================================================================
// Batch
// =============================================================================

#[tokio::test]
async fn batch_fixture_produces_one_line_per_row() {
    let entries = batch::load_from_file(&fixtures().join("batch.csv")).expect("fixture should load");
    let mut estimator = offline_estimator(2019);
    let mut out = Vec::new();

    let summaries = run_batch(&mut estimator, &entries, &mut out).await.unwrap();

    assert_eq!(summaries.len(), 3);
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "row 1: single income $50000.00 federal $6858.16 (13.72%) CA $1982.34 (3.96%) total $8840.50 (17.68%)",
            "row 2: married income $120000.00 federal $18116.66 (15.10%) total $18116.66 (15.10%)",
            "row 3: head_of_household income $9700.00 federal $970.00 (10.00%) TX $0.00 (0.00%) total $970.00 (10.00%)",
        ]
    );
}

#[tokio::test]
async fn tables_are_loaded_once_per_jurisdiction_and_status() {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = Counting {
        inner: FileCache::new(fixtures()),
        calls: Arc::clone(&calls),
    };
    let mut estimator = Estimator::new(source, 2019);

    for income in [dec!(1000), dec!(50000), dec!(250000)] {
        estimator
            .estimate(FilingStatus::Single, income, Jurisdiction::state("CA"))
            .await
            .unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn config_file_is_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("estimator.toml");
    std::fs::write(&path, "year = 2019\noffline = true\n").unwrap();

    let config = EstimatorConfig::load(Some(&path)).unwrap();

    assert_eq!(config.year, 2019);
    assert!(config.offline);
}
