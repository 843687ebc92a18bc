//! Derived columns computed from parsed records
//!
//! Adds the calendar date, the file age relative to the run's reference date
//! and the lowercase extension to each [`FileRecord`].

use super::constants::UNKNOWN_EXTENSION;
use crate::common::data_structures::{AnnotatedRecord, FileRecord};
use chrono::{Month, NaiveDate};

/// Combines year, month abbreviation and day into a date
///
/// Returns `None` for unknown month names and impossible days such as Feb 30.
pub fn record_date(record: &FileRecord) -> Option<NaiveDate> {
    let month = record.month.parse::<Month>().ok()?;
    NaiveDate::from_ymd_opt(record.year, month.number_from_month(), record.day)
}

/// Whole days from `date` to `reference_date`
///
/// Negative for dates after the reference date, which happens when a
/// synthetic year places a recent `HH:MM` entry in the future.
pub fn file_age(date: NaiveDate, reference_date: NaiveDate) -> i64 {
    (reference_date - date).num_days()
}

/// Lowercase text after the last `.` in the filename, or [`UNKNOWN_EXTENSION`]
pub fn extension_of(filename: &str) -> String {
    match filename.rfind('.') {
        Some(dot_index) => filename[dot_index + 1..].to_lowercase(),
        None => UNKNOWN_EXTENSION.to_string(),
    }
}

/// Annotates every record with its derived columns
pub fn annotate(records: &[FileRecord], reference_date: NaiveDate) -> Vec<AnnotatedRecord<'_>> {
    records
        .iter()
        .map(|record| {
            let date = record_date(record);
            AnnotatedRecord {
                record,
                date,
                file_age: date.map(|date| file_age(date, reference_date)),
                extension: extension_of(&record.filename),
            }
        })
        .collect()
}
