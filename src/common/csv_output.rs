//! CSV export of parsed and derived tables

use crate::common::data_structures::AnnotatedRecord;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing CSV output
#[derive(Error, Debug)]
pub enum CsvOutputError {
    #[error("Failed to write CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush CSV file: {0}")]
    Flush(#[from] std::io::Error),
}

type Result<T> = core::result::Result<T, CsvOutputError>;

/// One row of `parsed_listing.csv`
#[derive(Debug, Serialize)]
pub struct RecordRow<'a> {
    pub permissions: &'a str,
    pub links: &'a str,
    pub owner: &'a str,
    pub group: &'a str,
    pub size: u64,
    pub month: &'a str,
    pub day: u32,
    pub year: i32,
    pub time: Option<&'a str>,
    pub filename: &'a str,
    /// ISO 8601 date, empty when the listing date is not a valid calendar date
    pub date: Option<String>,
    pub file_age: Option<i64>,
    pub extension: &'a str,
}

impl<'a, 'r: 'a> From<&'a AnnotatedRecord<'r>> for RecordRow<'a> {
    fn from(annotated: &'a AnnotatedRecord<'r>) -> Self {
        let record = annotated.record;
        Self {
            permissions: &record.permissions,
            links: &record.links,
            owner: &record.owner,
            group: &record.group,
            size: record.size,
            month: &record.month,
            day: record.day,
            year: record.year,
            time: record.time.as_deref(),
            filename: &record.filename,
            date: annotated.date.map(|date| date.format("%Y-%m-%d").to_string()),
            file_age: annotated.file_age,
            extension: &annotated.extension,
        }
    }
}

/// Column names of `parsed_listing.csv`, in [`RecordRow`] field order
pub const RECORD_HEADER: [&str; 13] = [
    "permissions",
    "links",
    "owner",
    "group",
    "size",
    "month",
    "day",
    "year",
    "time",
    "filename",
    "date",
    "file_age",
    "extension",
];

/// Writes serializable rows to a CSV file below an explicit header line
///
/// The header is written even when there are no rows, so an empty table
/// still names its columns.
pub fn write_rows<S, I>(header: &[&str], rows: I, output_path: &Path) -> Result<()>
where
    S: Serialize,
    I: IntoIterator<Item = S>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(output_path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes every annotated record to `output_path`
pub fn write_records_csv(records: &[AnnotatedRecord<'_>], output_path: &Path) -> Result<()> {
    write_rows(&RECORD_HEADER, records.iter().map(RecordRow::from), output_path)
}
