//! tablescrape CLI
//!
//! Scrape tables, headings, links and images from a rendered web page and
//! export them as CSV.

mod config;
mod display;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use config::{Config, Engine};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tablescrape_core::{
    export, extract, scrape, BrowserSource, ExtractionResult, HeadingLevel, HttpSource,
    ScrapeRequest,
};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tablescrape")]
#[command(author, version, about = "Scrape tables, headings and links from a web page", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a URL in headless Chrome and scrape it
    Scrape {
        /// URL to scrape
        url: String,

        #[command(flatten)]
        options: ExtractOptions,

        /// Milliseconds to wait after navigation before capturing the page
        #[arg(long)]
        settle_ms: Option<u64>,

        /// Skip JavaScript rendering (HTTP only)
        #[arg(long)]
        no_js: bool,
    },

    /// Scrape HTML read from stdin
    Extract {
        #[command(flatten)]
        options: ExtractOptions,
    },
}

#[derive(Args)]
struct ExtractOptions {
    /// Scrape headline text (needs --tags)
    #[arg(long)]
    headlines: bool,

    /// Heading levels to scrape, in order, e.g. h1,h2
    #[arg(long, value_delimiter = ',')]
    tags: Vec<HeadingLevel>,

    /// Scrape absolute links
    #[arg(long)]
    links: bool,

    /// Scrape absolute image sources
    #[arg(long)]
    images: bool,

    /// CSS class of the tables to scrape (default: wikitable)
    #[arg(long)]
    table_class: Option<String>,

    /// Output format: text, json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Directory to write table_N.csv / scraped_links.csv into
    #[arg(short, long)]
    export: Option<PathBuf>,
}

impl ExtractOptions {
    fn to_request(&self, url: &str, config: &Config) -> ScrapeRequest {
        let table_class = self
            .table_class
            .clone()
            .unwrap_or_else(|| config.scrape.table_class.clone());

        let mut request = ScrapeRequest::new(url)
            .with_links(self.links)
            .with_images(self.images)
            .with_table_class(table_class);
        if self.headlines {
            request = request.with_headlines(self.tags.iter().copied());
        }
        request
    }
}

#[derive(Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    if cli.verbose {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .with(tracing_subscriber::EnvFilter::new("debug"))
            .init();
    }

    let config = Config::load(cli.config.as_deref())?;
    debug!("Loaded config: {:?}", config);

    match cli.command {
        Commands::Scrape {
            url,
            options,
            settle_ms,
            no_js,
        } => run_scrape(&url, &options, settle_ms, no_js, &config).await,
        Commands::Extract { options } => run_extract(&options, &config),
    }
}

async fn run_scrape(
    url: &str,
    options: &ExtractOptions,
    settle_ms: Option<u64>,
    no_js: bool,
    config: &Config,
) -> Result<()> {
    let request = options.to_request(url, config);

    let result = if no_js || config.browser.engine == Engine::Http {
        let source = HttpSource::new(Duration::from_secs(config.browser.timeout_secs))?;
        scrape(&source, &request).await
    } else {
        let mut chrome = config.to_chrome_config();
        if let Some(ms) = settle_ms {
            chrome.settle_delay = Duration::from_millis(ms);
        }
        scrape(&BrowserSource::new(chrome), &request).await
    };

    emit(&result, options, config)
}

fn run_extract(options: &ExtractOptions, config: &Config) -> Result<()> {
    let mut html = String::new();
    io::stdin().read_to_string(&mut html)?;

    let request = options.to_request("about:blank", config);
    let result = extract::extract(&html, &request);

    emit(&result, options, config)
}

fn emit(result: &ExtractionResult, options: &ExtractOptions, config: &Config) -> Result<()> {
    if let Some(ref error) = result.error {
        bail!("{}", error);
    }

    match options.format {
        OutputFormat::Text => print!("{}", display::render_result(result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
    }

    if let Some(dir) = export_dir(options, config) {
        let artifacts = export::artifacts(result)?;
        for path in export::write_artifacts(dir, &artifacts)? {
            eprintln!("Saved {}", path.display());
        }
    }

    Ok(())
}

/// `--export` wins over the configured export directory
fn export_dir<'a>(options: &'a ExtractOptions, config: &'a Config) -> Option<&'a Path> {
    options
        .export
        .as_deref()
        .or(config.export.dir.as_deref())
}
