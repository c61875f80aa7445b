//! Page sources: headless browser and plain HTTP

use crate::chrome::{BrowserSession, ChromeConfig};
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Anything that can turn a URL into page markup
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Navigate to `url` and return the markup as it stands afterwards
    async fn navigate(&self, url: &str) -> Result<String, FetchError>;
}

/// Renders pages in a fresh headless Chrome per request
#[derive(Debug, Clone, Default)]
pub struct BrowserSource {
    config: ChromeConfig,
}

impl BrowserSource {
    pub fn new(config: ChromeConfig) -> Self {
        Self { config }
    }

    async fn render(&self, session: &BrowserSession, url: &Url) -> Result<String, FetchError> {
        let page = session
            .browser
            .new_page(url.as_str())
            .await
            .map_err(FetchError::new)?;

        // No readiness signal; give client-side scripts a fixed window
        debug!("Settling for {:?}", self.config.settle_delay);
        tokio::time::sleep(self.config.settle_delay).await;

        let html = page.content().await.map_err(FetchError::new)?;

        let _ = page.close().await;

        Ok(html)
    }
}

impl PageSource for BrowserSource {
    async fn navigate(&self, url: &str) -> Result<String, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::new(format!("{}: {}", e, url)))?;
        info!("Fetching with browser: {}", url);

        let session = BrowserSession::launch(&self.config).await?;
        let result = self.render(&session, &url).await;
        session.shutdown().await;

        if let Ok(ref html) = result {
            debug!("Captured {} bytes of markup", html.len());
        }
        result
    }
}

/// Fetches raw server markup without running scripts
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(format!("tablescrape/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(FetchError::new)?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    async fn navigate(&self, url: &str) -> Result<String, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::new(format!("{}: {}", e, url)))?;
        info!("Fetching with HTTP: {}", url);

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(FetchError::new)?;
        response.text().await.map_err(FetchError::new)
    }
}
