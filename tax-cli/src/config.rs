//! Estimator settings: built-in defaults, an optional TOML file, then
//! command-line overrides.
//!
//! ```toml
//! data_dir = "/var/cache/tax-data"
//! year = 2019
//! offline = true
//! log_level = "info"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use tax_data::DEFAULT_BASE_URL;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Root of the bracket cache (`<data_dir>/<year>/<file>.json`).
    pub data_dir: PathBuf,
    pub year: i32,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Never download; a cache miss is an error.
    pub offline: bool,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("tax-data"),
            year: Local::now().year(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            offline: false,
            log_level: "warn".to_string(),
        }
    }
}

/// Values given on the command line. `None`/`false` leaves the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub year: Option<i32>,
    pub base_url: Option<String>,
    pub offline: bool,
    pub log_level: Option<String>,
}

impl EstimatorConfig {
    pub fn from_toml_str(
        text: &str,
        origin: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Reads `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    pub fn apply(
        mut self,
        overrides: ConfigOverrides,
    ) -> Self {
        if let Some(dir) = overrides.data_dir {
            self.data_dir = dir;
        }
        if let Some(year) = overrides.year {
            self.year = year;
        }
        if let Some(url) = overrides.base_url {
            self.base_url = url;
        }
        if overrides.offline {
            self.offline = true;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
