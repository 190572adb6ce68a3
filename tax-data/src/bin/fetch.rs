use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tax_data::{
    BracketSource, CachedSource, DEFAULT_BASE_URL, FileCache, Jurisdiction, RemoteSource, STATES,
    TaxDataError, taxee,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Download taxee bracket data into the local cache.
///
/// Files land in `<data-dir>/<year>/<jurisdiction>.json`, which is the
/// layout `tax-estimator --offline` reads from. Files already present
/// are left alone unless `--refresh` is given.
#[derive(Parser, Debug)]
#[command(name = "tax-data-fetch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Tax year to download
    #[arg(short, long, default_value_t = 2019)]
    year: i32,

    /// Cache directory
    #[arg(short, long, default_value = "tax-data")]
    data_dir: PathBuf,

    /// State abbreviation to fetch in addition to federal data (repeatable)
    #[arg(short, long = "state", value_name = "ABBR")]
    states: Vec<String>,

    /// Fetch every state
    #[arg(long, default_value_t = false, conflicts_with = "states")]
    all_states: bool,

    /// Base URL of the statistics tree
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Download again even when a cached copy exists
    #[arg(long, default_value_t = false)]
    refresh: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

fn jurisdictions(args: &Args) -> Result<Vec<Jurisdiction>> {
    let mut wanted = vec![Jurisdiction::Federal];

    if args.all_states {
        wanted.extend(STATES.iter().map(Jurisdiction::State));
        return Ok(wanted);
    }

    for abbr in &args.states {
        let state =
            Jurisdiction::state(abbr).ok_or_else(|| TaxDataError::UnknownState(abbr.clone()))?;
        wanted.push(state);
    }
    Ok(wanted)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let wanted = jurisdictions(&args)?;

    let cache = FileCache::new(&args.data_dir);
    let remote = RemoteSource::new(&args.base_url, Duration::from_secs(args.timeout))
        .context("Failed to build HTTP client")?;

    info!(
        year = args.year,
        count = wanted.len(),
        dir = %args.data_dir.display(),
        "fetching bracket data"
    );

    let mut stored = 0usize;
    let mut failed = 0usize;

    for jurisdiction in wanted {
        if !args.refresh && cache.contains(args.year, jurisdiction).await {
            info!(%jurisdiction, "already cached");
            continue;
        }

        let body = match remote.fetch(args.year, jurisdiction).await {
            Ok(body) => body,
            Err(error) => {
                warn!(%jurisdiction, %error, "download failed");
                failed += 1;
                continue;
            }
        };

        // Refuse to cache something the estimator could not read back.
        if let Err(error) = taxee::parse_for(jurisdiction, &body) {
            warn!(%jurisdiction, %error, "downloaded data is not usable");
            failed += 1;
            continue;
        }

        let path = cache
            .store(args.year, jurisdiction, &body)
            .await
            .with_context(|| format!("Failed to cache data for {jurisdiction}"))?;
        info!(%jurisdiction, path = %path.display(), "stored");
        stored += 1;
    }

    println!("Stored {stored} file(s), {failed} failure(s).");

    // Offline readers go through the same source the estimator uses.
    let check = CachedSource::offline(cache);
    if let Err(error) = check.fetch(args.year, Jurisdiction::Federal).await {
        bail!("federal data for {} is not available: {error}", args.year);
    }

    if failed > 0 {
        bail!("{failed} jurisdiction(s) could not be fetched");
    }
    Ok(())
}
