//! CSV export of extraction results

use crate::{ExtractionResult, Result, ScrapeError, TableRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const LINKS_FILE_NAME: &str = "scraped_links.csv";
pub const IMAGES_FILE_NAME: &str = "scraped_images.csv";

/// A named CSV document ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub contents: String,
}

/// Serialize a table as CSV: the header row, then every data row.
///
/// A table without headers has zero-width rows and serializes to an empty
/// document.
pub fn table_to_csv(table: &TableRecord) -> Result<String> {
    if table.headers().is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    into_string(writer)
}

/// Serialize links as a single `Links` column
pub fn links_to_csv(links: &[String]) -> Result<String> {
    single_column_csv("Links", links)
}

/// Serialize image sources as a single `Images` column
pub fn images_to_csv(images: &[String]) -> Result<String> {
    single_column_csv("Images", images)
}

fn single_column_csv(header: &str, values: &[String]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([header])?;
    for value in values {
        writer.write_record([value])?;
    }
    into_string(writer)
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ScrapeError::Other(format!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ScrapeError::Other(e.to_string()))
}

/// Every downloadable document for a result: `table_{n}.csv` per table,
/// then the links and images lists when non-empty
pub fn artifacts(result: &ExtractionResult) -> Result<Vec<ExportArtifact>> {
    if result.is_error() {
        return Ok(Vec::new());
    }

    let mut artifacts = Vec::with_capacity(result.tables.len() + 2);
    for (i, table) in result.tables.iter().enumerate() {
        artifacts.push(ExportArtifact {
            file_name: format!("table_{}.csv", i + 1),
            contents: table_to_csv(table)?,
        });
    }

    if !result.links.is_empty() {
        artifacts.push(ExportArtifact {
            file_name: LINKS_FILE_NAME.to_string(),
            contents: links_to_csv(&result.links)?,
        });
    }

    if !result.images.is_empty() {
        artifacts.push(ExportArtifact {
            file_name: IMAGES_FILE_NAME.to_string(),
            contents: images_to_csv(&result.images)?,
        });
    }

    Ok(artifacts)
}

/// Write artifacts into `dir`, creating it if needed
pub fn write_artifacts(dir: &Path, artifacts: &[ExportArtifact]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        debug!("Writing {} bytes to {:?}", artifact.contents.len(), path);
        fs::write(&path, &artifact.contents)?;
        written.push(path);
    }

    info!("Exported {} CSV files to {:?}", written.len(), dir);
    Ok(written)
}
