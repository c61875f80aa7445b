//! Table, heading, link and image extraction

use crate::{ExtractionResult, HeadingLevel, ScrapeRequest, TableRecord};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

/// Raw attribute values must start with this to count as absolute
const ABSOLUTE_PREFIX: &str = "http";

/// Parse the markup once and run every extraction the request asks for
pub fn extract(markup: &str, request: &ScrapeRequest) -> ExtractionResult {
    let document = Html::parse_document(markup);

    let tables = extract_tables(&document, &request.table_class);
    if tables.is_empty() {
        info!("No tables found on this page.");
    }

    let headlines = if request.want_headlines {
        extract_headlines(&document, &request.headline_levels)
    } else {
        Vec::new()
    };

    let links = if request.want_links {
        extract_links(&document)
    } else {
        Vec::new()
    };

    let images = if request.want_images {
        extract_images(&document)
    } else {
        Vec::new()
    };

    ExtractionResult {
        tables,
        headlines,
        links,
        images,
        error: None,
    }
}

/// Extract every table carrying `class` as one of its class tokens, in
/// document order
pub fn extract_tables(document: &Html, class: &str) -> Vec<TableRecord> {
    if class.is_empty() || class.contains(char::is_whitespace) {
        warn!("Invalid table class {:?}: expected a single class name", class);
        return Vec::new();
    }

    let selector = Selector::parse("table").unwrap();
    document
        .select(&selector)
        .filter(|table| table.value().classes().any(|c| c == class))
        .enumerate()
        .map(|(i, table)| {
            info!("Scraping table {}...", i + 1);
            table_record(table)
        })
        .collect()
}

fn table_record(table: ElementRef) -> TableRecord {
    let row_selector = Selector::parse("tr").unwrap();
    let header_selector = Selector::parse("th").unwrap();
    let cell_selector = Selector::parse("th, td").unwrap();

    let mut rows = table.select(&row_selector);

    let headers = match rows.next() {
        Some(first) => first.select(&header_selector).map(trimmed_text).collect(),
        None => {
            debug!("Table has no rows");
            Vec::new()
        }
    };

    let body = rows.map(|row| row.select(&cell_selector).map(trimmed_text).collect());

    TableRecord::new(headers, body)
}

/// Text of each requested heading level, concatenated in request order
pub fn extract_headlines(document: &Html, levels: &[HeadingLevel]) -> Vec<String> {
    let mut headlines = Vec::new();
    for level in levels {
        let selector = Selector::parse(level.tag()).unwrap();
        headlines.extend(document.select(&selector).map(trimmed_text));
    }
    headlines
}

/// Absolute `href` values of every anchor
pub fn extract_links(document: &Html) -> Vec<String> {
    absolute_attr_values(document, "a[href]", "href")
}

/// Absolute `src` values of every image
pub fn extract_images(document: &Html) -> Vec<String> {
    absolute_attr_values(document, "img[src]", "src")
}

fn absolute_attr_values(document: &Html, selector: &str, attr: &str) -> Vec<String> {
    let selector = Selector::parse(selector).unwrap();
    document
        .select(&selector)
        .filter_map(|el| el.value().attr(attr))
        .filter(|value| value.starts_with(ABSOLUTE_PREFIX))
        .map(String::from)
        .collect()
}

fn trimmed_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    const TWO_TABLES: &str = r#"
        <html><body>
          <table class="wikitable sortable">
            <tr><th> Country </th><th>Capital</th><th></th></tr>
            <tr><td>France</td><td> Paris </td><td>EU</td></tr>
            <tr><td>Norway</td><td>Oslo</td></tr>
          </table>
          <table class="infobox"><tr><th>Ignored</th></tr></table>
          <table class="wikitable">
            <tr><th>Only</th><th>Headers</th></tr>
          </table>
        </body></html>
    "#;

    #[test]
    fn test_wikitable_scenario() {
        let result = extract(TWO_TABLES, &ScrapeRequest::new("https://example.org"));
        assert_eq!(result.tables.len(), 2);

        let first = &result.tables[0];
        assert_eq!(first.headers(), strings(&["Country", "Capital", ""]).as_slice());
        assert_eq!(first.rows().len(), 2);
        assert_eq!(first.rows()[0], strings(&["France", "Paris", "EU"]));
        assert_eq!(first.rows()[1], strings(&["Norway", "Oslo", ""]));

        let second = &result.tables[1];
        assert_eq!(second.headers(), strings(&["Only", "Headers"]).as_slice());
        assert!(second.rows().is_empty());
    }

    #[test]
    fn test_th_cells_count_in_body_rows() {
        let html = r#"<table class="wikitable">
            <tr><th>Rank</th><th>Name</th></tr>
            <tr><th>1</th><td>Alpha</td><td>overflow</td></tr>
        </table>"#;
        let tables = extract_tables(&Html::parse_document(html), "wikitable");
        assert_eq!(tables[0].rows()[0], strings(&["1", "Alpha"]));
    }

    #[test]
    fn test_header_row_without_th_truncates_everything() {
        let html = r#"<table class="wikitable">
            <tr><td>a</td><td>b</td></tr>
            <tr><td>c</td><td>d</td></tr>
        </table>"#;
        let tables = extract_tables(&Html::parse_document(html), "wikitable");
        assert!(tables[0].headers().is_empty());
        assert_eq!(tables[0].rows(), &[Vec::<String>::new()]);
    }

    #[test]
    fn test_table_without_rows() {
        let html = r#"<table class="wikitable"></table>"#;
        let tables = extract_tables(&Html::parse_document(html), "wikitable");
        assert_eq!(tables.len(), 1);
        assert!(tables[0].headers().is_empty());
        assert!(tables[0].rows().is_empty());
    }

    #[test]
    fn test_no_tables_is_not_an_error() {
        let result = extract("<p>nothing here</p>", &ScrapeRequest::new("https://example.org"));
        assert!(result.tables.is_empty());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_invalid_table_class_yields_nothing() {
        let document = Html::parse_document(TWO_TABLES);
        assert!(extract_tables(&document, "").is_empty());
        assert!(extract_tables(&document, "wikitable sortable").is_empty());
        assert!(extract_tables(&document, "not a class!").is_empty());
    }

    #[test]
    fn test_table_class_is_matched_literally() {
        let html = r#"
            <div class="x"><table><tr><th>Inner</th></tr></table></div>
            <table class="x"><tr><th>Match</th></tr></table>
            <div><table class="x, div"><tr><th>Odd</th></tr></table></div>
        "#;
        let document = Html::parse_document(html);

        let tables = extract_tables(&document, "x");
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers(), strings(&["Match"]).as_slice());

        let tables = extract_tables(&document, "x,");
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers(), strings(&["Odd"]).as_slice());
    }

    #[test]
    fn test_custom_table_class() {
        let tables = extract_tables(&Html::parse_document(TWO_TABLES), "infobox");
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers(), strings(&["Ignored"]).as_slice());
    }

    #[test]
    fn test_headline_order_follows_requested_levels() {
        let html = "<h1>Title</h1><h2>First</h2><h3>Deep</h3><h2>Second</h2>";
        let document = Html::parse_document(html);

        let headlines = extract_headlines(
            &document,
            &[HeadingLevel::H2, HeadingLevel::H1, HeadingLevel::H2],
        );
        assert_eq!(
            headlines,
            strings(&["First", "Second", "Title", "First", "Second"])
        );
    }

    #[test]
    fn test_headlines_need_flag_and_levels() {
        let html = "<h1> Title </h1>";
        let mut request = ScrapeRequest::new("https://example.org");
        request.headline_levels = vec![HeadingLevel::H1];
        assert!(extract(html, &request).headlines.is_empty());

        let request = ScrapeRequest::new("https://example.org").with_headlines(Vec::<HeadingLevel>::new());
        assert!(extract(html, &request).headlines.is_empty());

        let request = ScrapeRequest::new("https://example.org").with_headlines([HeadingLevel::H1]);
        assert_eq!(extract(html, &request).headlines, strings(&["Title"]));
    }

    #[test]
    fn test_link_scenario() {
        let html = r##"
            <a href="/relative">r</a>
            <a href="https://a.example/x">a</a>
            <a href="http://b.example/y">b</a>
            <a href="#frag">f</a>
        "##;
        let request = ScrapeRequest::new("https://example.org").with_links(true);
        let result = extract(html, &request);
        assert_eq!(
            result.links,
            strings(&["https://a.example/x", "http://b.example/y"])
        );
    }

    #[test]
    fn test_links_drop_scheme_relative_and_keep_duplicates() {
        let html = r#"
            <a href="//cdn.example/z">s</a>
            <a>no href</a>
            <a href="https://a.example/x">1</a>
            <a href="https://a.example/x">2</a>
        "#;
        let links = extract_links(&Html::parse_document(html));
        assert_eq!(links, strings(&["https://a.example/x", "https://a.example/x"]));
    }

    #[test]
    fn test_links_off_by_default() {
        let html = r#"<a href="https://a.example/x">a</a>"#;
        let result = extract(html, &ScrapeRequest::new("https://example.org"));
        assert!(result.links.is_empty());
    }

    #[test]
    fn test_image_extraction() {
        let html = r#"
            <img src="https://img.example/a.png">
            <img src="/static/b.png">
            <img src="">
            <img alt="no source">
            <img src="http://img.example/c.jpg">
        "#;
        let request = ScrapeRequest::new("https://example.org").with_images(true);
        let result = extract(html, &request);
        assert_eq!(
            result.images,
            strings(&["https://img.example/a.png", "http://img.example/c.jpg"])
        );

        let result = extract(html, &ScrapeRequest::new("https://example.org"));
        assert!(result.images.is_empty());
    }
}
