//! Layered settings
//!
//! Defaults are overridden by the TOML config file, which is overridden by
//! environment variables and command-line flags (clap reads both).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use orchview_api::ClientConfig;
use orchview_logs::PageSize;

/// Default number of folder logs fetched per "load more"
pub const DEFAULT_LOAD_MORE_STEP: usize = 50;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub page_size: Option<PageSize>,
    pub load_more_step: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub export_dir: Option<PathBuf>,
}

impl FileConfig {
    /// `<config dir>/orchview/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("orchview").join("config.toml"))
    }

    /// Load the explicit file, or the default one if it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub page_size: Option<PageSize>,
    pub export_dir: Option<PathBuf>,
}

/// Fully resolved settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub token: String,
    pub page_size: PageSize,
    pub load_more_step: usize,
    pub request_timeout: Duration,
    pub export_dir: PathBuf,
}

impl Settings {
    /// Layer overrides on top of the file; base URL and token are required
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let Some(base_url) = overrides.base_url.or(file.base_url) else {
            bail!("missing `base_url`: pass --base-url, set ORCHVIEW_BASE_URL or add it to the config file");
        };
        let Some(token) = overrides.token.or(file.token) else {
            bail!("missing `token`: pass --token, set ORCHVIEW_TOKEN or add it to the config file");
        };

        let load_more_step = file.load_more_step.unwrap_or(DEFAULT_LOAD_MORE_STEP);
        if load_more_step == 0 {
            bail!("`load_more_step` must be at least 1");
        }

        Ok(Self {
            base_url,
            token,
            page_size: overrides.page_size.or(file.page_size).unwrap_or_default(),
            load_more_step,
            request_timeout: Duration::from_secs(
                file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            export_dir: overrides
                .export_dir
                .or(file.export_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url, &self.token).with_timeout(self.request_timeout)
    }
}
