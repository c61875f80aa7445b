//! Chrome discovery and single-use browser sessions
//!
//! Every scrape launches its own headless Chrome and shuts it down before
//! returning. Nothing is pooled or shared between requests.

use crate::FetchError;
use chromiumoxide::browser::{Browser, BrowserConfig, HeadlessMode};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Wait after navigation before the markup is captured
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Upper bound on any single CDP request, navigation included
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for headless Chrome sessions
#[derive(Debug, Clone)]
pub struct ChromeConfig {
    /// Custom Chrome binary path
    pub chrome_path: Option<PathBuf>,
    /// Fixed delay after navigation for client-side rendering
    pub settle_delay: Duration,
    /// CDP request timeout
    pub request_timeout: Duration,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            settle_delay: DEFAULT_SETTLE_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ChromeConfig {
    /// Pick the Chrome executable to launch.
    ///
    /// A configured path must exist. Otherwise well-known install locations
    /// and `PATH` are searched; `None` leaves detection to chromiumoxide.
    pub fn resolve_executable(&self) -> Result<Option<PathBuf>, FetchError> {
        if let Some(ref path) = self.chrome_path {
            if path.exists() {
                return Ok(Some(path.clone()));
            }
            return Err(FetchError::new(format!(
                "Chrome executable not found at {}",
                path.display()
            )));
        }
        Ok(find_system_chrome())
    }
}

/// A running headless browser owned by exactly one request
pub struct BrowserSession {
    pub browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch headless Chrome with the fixed scraping flags
    pub async fn launch(config: &ChromeConfig) -> Result<Self, FetchError> {
        let mut builder = BrowserConfig::builder()
            .headless_mode(HeadlessMode::True)
            .no_sandbox()
            .arg("--disable-gpu")
            .request_timeout(config.request_timeout);

        if let Some(path) = config.resolve_executable()? {
            debug!("Launching browser from {:?}", path);
            builder = builder.chrome_executable(path);
        }

        let browser_config = builder.build().map_err(FetchError::new)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| FetchError::new(format!("Failed to launch browser: {}", e)))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        Ok(Self { browser, handler })
    }

    /// Close the browser, reap the process and stop the event handler
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();
        debug!("Browser session shut down");
    }
}

/// Find Chrome installed on the system
pub fn find_system_chrome() -> Option<PathBuf> {
    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ]
    } else if cfg!(target_os = "linux") {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ]
    } else if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ]
    } else {
        &[]
    };

    candidates
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
        .or_else(|| {
            ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"]
                .iter()
                .find_map(|name| which::which(name).ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_config_default() {
        let config = ChromeConfig::default();
        assert!(config.chrome_path.is_none());
        assert_eq!(config.settle_delay, Duration::from_secs(2));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_configured_executable() {
        let config = ChromeConfig {
            chrome_path: Some(PathBuf::from("/definitely/not/here/chrome")),
            ..Default::default()
        };
        let err = config.resolve_executable().unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/chrome"));
    }

    #[test]
    fn test_discovered_chrome_exists() {
        if let Some(path) = find_system_chrome() {
            assert!(path.exists(), "discovered {:?} does not exist", path);
        }
    }

    #[test]
    fn test_unset_path_falls_back_to_discovery() {
        let resolved = ChromeConfig::default().resolve_executable().unwrap();
        assert_eq!(resolved, find_system_chrome());
    }

    #[test]
    fn test_existing_configured_executable_wins() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = ChromeConfig {
            chrome_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_executable().unwrap(),
            Some(file.path().to_path_buf())
        );
    }
}
