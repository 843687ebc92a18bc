//! File age analysis functionality
//!
//! Ages are whole days between a file's listing date and the run's reference
//! date, computed for regular files whose date is a valid calendar date.

use super::constants::DAYS_PER_YEAR;
use crate::common::buckets::{count_into_buckets, format_bucket_table, BucketRange, BucketRow};
use crate::common::data_structures::AnnotatedRecord;
use crate::common::plots::{create_age_cdf_plot, PlotSeries};
use crate::common::statistics::{rank_cdf, Summary};
use crate::common::PlotError;
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during file age analysis
#[derive(Error, Debug)]
pub enum FileAgeError {
    #[error("Failed to write file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to generate plot: {0}")]
    PlotGeneration(#[from] PlotError),
}

type Result<T> = core::result::Result<T, FileAgeError>;

/// A file singled out by its age
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedAge {
    pub filename: String,
    pub file_age: i64,
}

/// Age statistics of the dated regular files in a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeStatistics {
    pub summary: Option<Summary<i64>>,
    pub oldest: Option<NamedAge>,
    pub newest: Option<NamedAge>,
    /// Regular files left out because their listing date is not a valid date
    pub undated_files: usize,
}

/// `(filename, age)` of every regular file with a valid date, in listing order
fn dated_regular_files<'r>(records: &'r [AnnotatedRecord<'_>]) -> Vec<(&'r str, i64)> {
    records
        .iter()
        .filter(|annotated| annotated.record.is_regular())
        .filter_map(|annotated| {
            annotated
                .file_age
                .map(|age| (annotated.record.filename.as_str(), age))
        })
        .collect()
}

/// Ages of every dated regular file, in listing order
pub fn regular_file_ages(records: &[AnnotatedRecord<'_>]) -> Vec<i64> {
    dated_regular_files(records)
        .into_iter()
        .map(|(_, age)| age)
        .collect()
}

/// Computes [`AgeStatistics`] for annotated records
///
/// Oldest and newest take the first file in listing order on ties.
pub fn compute_age_statistics(records: &[AnnotatedRecord<'_>]) -> AgeStatistics {
    let dated = dated_regular_files(records);
    let regular = records
        .iter()
        .filter(|annotated| annotated.record.is_regular())
        .count();

    let mut oldest: Option<(&str, i64)> = None;
    let mut newest: Option<(&str, i64)> = None;
    for &(filename, age) in &dated {
        if oldest.map_or(true, |(_, current)| age > current) {
            oldest = Some((filename, age));
        }
        if newest.map_or(true, |(_, current)| age < current) {
            newest = Some((filename, age));
        }
    }

    let named = |(filename, file_age): (&str, i64)| NamedAge {
        filename: filename.to_string(),
        file_age,
    };

    let ages: Vec<i64> = dated.iter().map(|(_, age)| *age).collect();

    AgeStatistics {
        summary: Summary::of(&ages),
        oldest: oldest.map(named),
        newest: newest.map(named),
        undated_files: regular - dated.len(),
    }
}

/// Report ranges for file ages in days; negative ages are dated after the reference date
const AGE_RANGES: [BucketRange<i64>; 7] = [
    BucketRange::new("Future", i64::MIN, -1),
    BucketRange::new("<30 days", 0, 29),
    BucketRange::new("30 days-1 year", 30, DAYS_PER_YEAR - 1),
    BucketRange::new("1-2 years", DAYS_PER_YEAR, 2 * DAYS_PER_YEAR - 1),
    BucketRange::new("2-5 years", 2 * DAYS_PER_YEAR, 5 * DAYS_PER_YEAR - 1),
    BucketRange::new("5-10 years", 5 * DAYS_PER_YEAR, 10 * DAYS_PER_YEAR - 1),
    BucketRange::new("10+ years", 10 * DAYS_PER_YEAR, i64::MAX),
];

fn create_file_age_buckets(ages: &[i64]) -> Vec<BucketRow> {
    count_into_buckets(ages, &AGE_RANGES)
}

fn format_age_report(statistics: &AgeStatistics, buckets: &[BucketRow]) -> String {
    let mut output = String::new();
    output.push_str("File Age Analysis\n");
    output.push_str(&"=".repeat(17));
    output.push_str("\n\n");
    output.push_str(&format_bucket_table(
        "File Age Distribution (Fixed Ranges)",
        buckets,
    ));
    output.push_str("\n\n");

    if let Some(oldest) = &statistics.oldest {
        output.push_str(&format!(
            "The oldest file is '{}' with an age of {} days.\n",
            oldest.filename, oldest.file_age
        ));
    }
    if let Some(newest) = &statistics.newest {
        output.push_str(&format!(
            "The newest file is '{}' with an age of {} days.\n",
            newest.filename, newest.file_age
        ));
    }

    output.push('\n');
    output.push_str("Summary\n");
    output.push_str(&"=".repeat(7));
    output.push('\n');
    match &statistics.summary {
        Some(summary) => {
            output.push_str(&format!("Dated regular files: {}\n", summary.count));
            output.push_str(&format!("Mean file age: {:.2} days\n", summary.mean));
            output.push_str(&format!("Median file age: {} days\n", summary.median));
            output.push_str(&format!("Mode file age: {} days\n", summary.mode));
        }
        None => output.push_str("No dated regular files found.\n"),
    }
    output.push_str(&format!(
        "Files without a valid date: {}",
        statistics.undated_files
    ));

    output
}

/// Generate complete file age analysis
///
/// # Arguments
/// * `label` - Listing label, for log output
/// * `records` - Annotated records of the listing
/// * `output_dir` - Directory where file-age.txt should be saved
///
/// # Returns
/// * `Ok(AgeStatistics)` - The computed statistics, for the JSON summary
/// * `Err(FileAgeError)` - If file operations failed
pub fn generate_file_age_analysis(
    label: &str,
    records: &[AnnotatedRecord<'_>],
    output_dir: &Path,
) -> Result<AgeStatistics> {
    let statistics = compute_age_statistics(records);
    let buckets = create_file_age_buckets(&regular_file_ages(records));

    fs::write(
        output_dir.join("file-age.txt"),
        format_age_report(&statistics, &buckets),
    )?;

    if statistics.undated_files > 0 {
        warn!(
            listing = label,
            undated = statistics.undated_files,
            "Some regular files have no valid date and are left out of age statistics"
        );
    }
    if let Some(summary) = &statistics.summary {
        info!(
            listing = label,
            mean = summary.mean,
            median = summary.median,
            mode = summary.mode,
            "File age analysis complete"
        );
    }

    Ok(statistics)
}

/// Generate the file age cumulative distribution plot (`cdf_date_plot.png`)
///
/// # Arguments
/// * `label` - Listing label used for the series
/// * `records` - Annotated records of the listing
/// * `output_dir` - Directory where the PNG file should be saved
pub fn generate_file_age_plots(
    label: &str,
    records: &[AnnotatedRecord<'_>],
    output_dir: &Path,
) -> Result<()> {
    let ages = regular_file_ages(records);
    if ages.is_empty() {
        warn!(listing = label, "No dated regular files, skipping age plot");
        return Ok(());
    }

    let series = PlotSeries::from_samples(label, &rank_cdf(&ages));
    create_age_cdf_plot(&series, &output_dir.join("cdf_date_plot.png"))?;

    Ok(())
}
