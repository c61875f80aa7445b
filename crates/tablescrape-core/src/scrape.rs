//! Fetch-then-extract pipeline

use crate::fetch::PageSource;
use crate::{extract, ExtractionResult, ScrapeRequest};
use tracing::{info, warn};

/// Fetch `request.url` from `source` and extract from the captured markup
pub async fn scrape<S: PageSource>(source: &S, request: &ScrapeRequest) -> ExtractionResult {
    scrape_with(source, request, extract::extract).await
}

/// Like [`scrape`], with the extraction step supplied by the caller.
///
/// `extractor` only runs when the fetch succeeds; a fetch failure becomes
/// [`ExtractionResult::failed`] with every collection empty.
pub async fn scrape_with<S, F>(source: &S, request: &ScrapeRequest, extractor: F) -> ExtractionResult
where
    S: PageSource,
    F: FnOnce(&str, &ScrapeRequest) -> ExtractionResult,
{
    match source.navigate(&request.url).await {
        Ok(markup) => {
            let result = extractor(&markup, request);
            info!(
                "Scraped {} tables, {} headlines, {} links, {} images",
                result.tables.len(),
                result.headlines.len(),
                result.links.len(),
                result.images.len()
            );
            result
        }
        Err(e) => {
            warn!("Fetch failed for {}: {}", request.url, e);
            ExtractionResult::failed(e.to_string())
        }
    }
}
