//! Configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tablescrape_core::chrome::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_SETTLE_DELAY};
use tablescrape_core::{ChromeConfig, DEFAULT_TABLE_CLASS};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Page fetching settings
    #[serde(default)]
    pub browser: BrowserConfig,

    /// Extraction settings
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// CSV export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Which page source performs the fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Headless Chrome, scripts executed
    #[default]
    Browser,
    /// Plain HTTP GET, no scripts
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default)]
    pub engine: Engine,

    /// Custom Chrome binary path
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,

    /// Wait after navigation before capturing markup
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            chrome_path: None,
            settle_delay_ms: default_settle_delay_ms(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// CSS class marking the tables to extract
    #[serde(default = "default_table_class")]
    pub table_class: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            table_class: default_table_class(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory CSVs are written to when no --export is given
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY.as_millis() as u64
}
fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}
fn default_table_class() -> String {
    DEFAULT_TABLE_CLASS.to_string()
}

impl Config {
    /// Load configuration from `path`, or the default location, or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::config_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "tablescrape", "tablescrape")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Chrome settings for the browser page source
    pub fn to_chrome_config(&self) -> ChromeConfig {
        ChromeConfig {
            chrome_path: self.browser.chrome_path.clone(),
            settle_delay: Duration::from_millis(self.browser.settle_delay_ms),
            request_timeout: Duration::from_secs(self.browser.timeout_secs),
        }
    }
}
