use std::path::PathBuf;

use tax_core::TaxError;
use thiserror::Error;

/// Errors that can occur while obtaining or parsing jurisdiction data.
#[derive(Debug, Error)]
pub enum TaxDataError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing section '{0}' in bracket data")]
    MissingSection(String),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("no cached bracket data at '{}' (offline mode)", path.display())]
    NotCached { path: PathBuf },

    #[error("unknown state abbreviation '{0}'")]
    UnknownState(String),

    #[error(transparent)]
    Tax(#[from] TaxError),
}

impl TaxDataError {
    pub(crate) fn io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
