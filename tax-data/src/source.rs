//! Where raw jurisdiction data comes from: an on-disk cache, the remote
//! taxee repository, or the cache backed by the remote.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tax_core::{BracketTable, FilingStatus};
use tracing::{debug, info};

use crate::error::TaxDataError;
use crate::states::Jurisdiction;
use crate::taxee;

/// Upstream location of the taxee statistics, one directory per year.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/taxee/taxee-tax-statistics/master/src/statistics";

/// Supplies the raw JSON document for a jurisdiction and year.
#[async_trait]
pub trait BracketSource: Send + Sync {
    /// Short identifier used in log events.
    fn name(&self) -> &'static str;

    async fn fetch(
        &self,
        year: i32,
        jurisdiction: Jurisdiction,
    ) -> Result<String, TaxDataError>;
}

/// Bracket files stored as `<root>/<year>/<stem>.json`.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(
        &self,
        year: i32,
        jurisdiction: Jurisdiction,
    ) -> PathBuf {
        self.root
            .join(year.to_string())
            .join(jurisdiction.file_name())
    }

    pub async fn contains(
        &self,
        year: i32,
        jurisdiction: Jurisdiction,
    ) -> bool {
        tokio::fs::try_exists(self.path_for(year, jurisdiction))
            .await
            .unwrap_or(false)
    }

    /// Writes `body` into the cache, creating the year directory if needed.
    ///
    /// The body goes to a sibling `.part` file first and is renamed into
    /// place, so readers never see a partially written entry.
    pub async fn store(
        &self,
        year: i32,
        jurisdiction: Jurisdiction,
        body: &str,
    ) -> Result<PathBuf, TaxDataError> {
        let path = self.path_for(year, jurisdiction);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| TaxDataError::io(dir, e))?;
        }

        let partial = path.with_extension("json.part");
        if let Err(e) = tokio::fs::write(&partial, body).await {
            if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                debug!(path = %partial.display(), %cleanup, "could not remove partial file");
            }
            return Err(TaxDataError::io(&partial, e));
        }
        tokio::fs::rename(&partial, &path)
            .await
            .map_err(|e| TaxDataError::io(&path, e))?;
        debug!(path = %path.display(), bytes = body.len(), "stored bracket data");
        Ok(path)
    }
}

#[async_trait]
impl BracketSource for FileCache {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch(
        &self,
        year: i32,
        jurisdiction: Jurisdiction,
    ) -> Result<String, TaxDataError> {
        let path = self.path_for(year, jurisdiction);
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TaxDataError::NotCached { path })
            }
            Err(e) => Err(TaxDataError::io(path, e)),
        }
    }
}

/// Downloads bracket files over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: Client,
    base_url: String,
}

impl RemoteSource {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TaxDataError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(
        &self,
        year: i32,
        jurisdiction: Jurisdiction,
    ) -> String {
        format!("{}/{year}/{}", self.base_url, jurisdiction.file_name())
    }
}

#[async_trait]
impl BracketSource for RemoteSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn fetch(
        &self,
        year: i32,
        jurisdiction: Jurisdiction,
    ) -> Result<String, TaxDataError> {
        let url = self.url_for(year, jurisdiction);
        debug!(%url, "requesting bracket data");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TaxDataError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Reads from the cache and falls back to the remote on a miss, storing
/// what it downloads once it parses. Without a remote, a miss is an error.
#[derive(Debug, Clone)]
pub struct CachedSource {
    cache: FileCache,
    remote: Option<RemoteSource>,
}

impl CachedSource {
    pub fn new(
        cache: FileCache,
        remote: Option<RemoteSource>,
    ) -> Self {
        Self { cache, remote }
    }

    pub fn offline(cache: FileCache) -> Self {
        Self::new(cache, None)
    }
}

#[async_trait]
impl BracketSource for CachedSource {
    fn name(&self) -> &'static str {
        "cached"
    }

    async fn fetch(
        &self,
        year: i32,
        jurisdiction: Jurisdiction,
    ) -> Result<String, TaxDataError> {
        match self.cache.fetch(year, jurisdiction).await {
            Ok(body) => {
                info!(%jurisdiction, year, "using cached bracket data");
                Ok(body)
            }
            Err(TaxDataError::NotCached { path }) => {
                let Some(remote) = &self.remote else {
                    return Err(TaxDataError::NotCached { path });
                };
                info!(%jurisdiction, year, url = %remote.url_for(year, jurisdiction), "downloading bracket data");
                let body = remote.fetch(year, jurisdiction).await?;
                // Only bodies the estimator can read back are kept.
                taxee::parse_for(jurisdiction, &body)?;
                self.cache.store(year, jurisdiction, &body).await?;
                Ok(body)
            }
            Err(e) => Err(e),
        }
    }
}

/// Fetches, parses and normalizes one jurisdiction's brackets for
/// `statuses`.
pub async fn load_bracket_table<S>(
    source: &S,
    year: i32,
    jurisdiction: Jurisdiction,
    statuses: &[FilingStatus],
) -> Result<BracketTable, TaxDataError>
where
    S: BracketSource + ?Sized,
{
    debug!(source = source.name(), %jurisdiction, year, "loading bracket table");
    let body = source.fetch(year, jurisdiction).await?;

    let raw = taxee::parse_for(jurisdiction, &body)?;

    Ok(BracketTable::from_raw_for(&raw, statuses)?)
}
