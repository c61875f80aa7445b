//! Tablescrape Core Library
//!
//! Core functionality for tablescrape including:
//! - Chrome discovery and single-use headless browser sessions
//! - Page sources (headless browser, plain HTTP)
//! - Table, heading, link and image extraction
//! - CSV export of extracted results

pub mod chrome;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod scrape;

use serde::Serialize;
use thiserror::Error;

// Re-export key types
pub use chrome::ChromeConfig;
pub use export::ExportArtifact;
pub use fetch::{BrowserSource, HttpSource, PageSource};
pub use scrape::{scrape, scrape_with};

/// Table class selected when the caller does not name one
pub const DEFAULT_TABLE_CLASS: &str = "wikitable";

/// The single failure kind of the fetch stage.
///
/// Launch failures, navigation failures and timeouts all collapse into this
/// one opaque message carrying the underlying cause text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error occurred: {0}")]
pub struct FetchError(pub String);

impl FetchError {
    pub fn new(cause: impl std::fmt::Display) -> Self {
        Self(cause.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Heading tag levels that can be requested for headline extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    pub const ALL: [HeadingLevel; 6] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
        HeadingLevel::H5,
        HeadingLevel::H6,
    ];

    /// The HTML tag name for this level
    pub fn tag(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
            HeadingLevel::H5 => "h5",
            HeadingLevel::H6 => "h6",
        }
    }
}

impl std::str::FromStr for HeadingLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        HeadingLevel::ALL
            .into_iter()
            .find(|level| level.tag() == lower)
            .ok_or_else(|| format!("Unknown heading level: {}. Use h1 through h6", s))
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// What to scrape from a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    /// Target URL
    pub url: String,
    /// Whether to collect heading text
    pub want_headlines: bool,
    /// Heading levels to collect, traversed in this order
    pub headline_levels: Vec<HeadingLevel>,
    /// Whether to collect absolute hyperlinks
    pub want_links: bool,
    /// Whether to collect absolute image sources
    pub want_images: bool,
    /// CSS class marking the tables to extract
    pub table_class: String,
}

impl ScrapeRequest {
    /// A request that only extracts tables
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            want_headlines: false,
            headline_levels: Vec::new(),
            want_links: false,
            want_images: false,
            table_class: DEFAULT_TABLE_CLASS.to_string(),
        }
    }

    pub fn with_headlines(mut self, levels: impl IntoIterator<Item = HeadingLevel>) -> Self {
        self.want_headlines = true;
        self.headline_levels = levels.into_iter().collect();
        self
    }

    pub fn with_links(mut self, want: bool) -> Self {
        self.want_links = want;
        self
    }

    pub fn with_images(mut self, want: bool) -> Self {
        self.want_images = want;
        self
    }

    pub fn with_table_class(mut self, class: impl Into<String>) -> Self {
        self.table_class = class.into();
        self
    }
}

/// A table normalized so every row is as wide as the header row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableRecord {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableRecord {
    /// Build a record, truncating or blank-padding each row to the header width
    pub fn new<I>(headers: Vec<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// Everything extracted from one page, or the reason nothing was
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub tables: Vec<TableRecord>,
    pub headlines: Vec<String>,
    pub links: Vec<String>,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// A result carrying only an error; every collection stays empty
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
