//! Text rendering of scrape results

use std::fmt::Write;
use tablescrape_core::{ExtractionResult, TableRecord};
use unicode_width::UnicodeWidthStr;

/// Render a successful result the way it is shown on screen
pub fn render_result(result: &ExtractionResult) -> String {
    let mut out = String::new();

    // Progress notices come first, as they did while the page was scraped
    for i in 1..=result.tables.len() {
        let _ = writeln!(out, "Scraping Table {}...", i);
    }
    if result.tables.is_empty() {
        let _ = writeln!(out, "No tables found on this page.");
    }

    let _ = writeln!(out, "Data scraped successfully!");

    for (i, table) in result.tables.iter().enumerate() {
        let _ = writeln!(out, "\nTable {}:", i + 1);
        out.push_str(&render_table(table));
    }

    render_list(&mut out, "Headlines Found:", &result.headlines);
    render_list(&mut out, "Links Found:", &result.links);
    render_list(&mut out, "Images Found:", &result.images);

    out
}

fn render_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}", title);
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
}

/// Render a table as an aligned grid with a rule under the header
pub fn render_table(table: &TableRecord) -> String {
    let mut widths: Vec<usize> = table.headers().iter().map(|h| h.width()).collect();
    for row in table.rows() {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    push_row(&mut out, table.headers(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in table.rows() {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let padding = width.saturating_sub(cell.width());
            format!("{}{}", cell, " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}
