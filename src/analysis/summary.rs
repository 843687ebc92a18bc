//! Machine-readable summary of a listing's analysis (`summary.json`)

use super::file_age::AgeStatistics;
use super::file_size::SizeStatistics;
use super::file_type::ExtensionShare;
use crate::common::data_structures::{EntryKind, ParsedListing, SkipSummary};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing the summary
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Failed to create summary file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

type Result<T> = core::result::Result<T, SummaryError>;

/// Entry counts of a listing, by kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryCounts {
    pub total_records: usize,
    pub regular_files: usize,
    pub directories: usize,
    pub other_entries: usize,
}

impl EntryCounts {
    pub fn of(listing: &ParsedListing) -> Self {
        let mut counts = EntryCounts {
            total_records: listing.records.len(),
            ..Default::default()
        };
        for record in &listing.records {
            match record.kind() {
                EntryKind::Regular => counts.regular_files += 1,
                EntryKind::Directory => counts.directories += 1,
                EntryKind::Other => counts.other_entries += 1,
            }
        }
        counts
    }
}

/// Everything computed for one listing
#[derive(Debug, Clone, Serialize)]
pub struct ListingReport {
    pub label: String,
    pub reference_date: NaiveDate,
    pub synthetic_year: i32,
    pub lines_read: usize,
    pub entries: EntryCounts,
    pub skipped: SkipSummary,
    pub size: SizeStatistics,
    pub age: AgeStatistics,
    pub top_file_types: Vec<ExtensionShare>,
}

/// Writes the report as pretty-printed JSON to `summary.json` in `output_dir`
pub fn write_summary(report: &ListingReport, output_dir: &Path) -> Result<()> {
    let file = File::create(output_dir.join("summary.json"))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    Ok(())
}
