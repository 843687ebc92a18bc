//! File size analysis functionality
//!
//! This module provides functions for analyzing file size distributions over the
//! regular files of a listing: central tendency, extremes over unique filenames,
//! the discrete size PDF and its CDF.

use super::constants::{GB, KB, MB};
use crate::common::buckets::{count_into_buckets, format_bucket_table, BucketRange, BucketRow};
use crate::common::data_structures::{FileRecord, ParsedListing};
use crate::common::plots::{create_size_cdf_plot, create_size_pdf_plot, PlotSeries};
use crate::common::statistics::{cumulative_mass, probability_mass, Summary};
use crate::common::PlotError;
use bytesize::ByteSize;
use hashbrown::HashSet;
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during file size analysis
#[derive(Error, Debug)]
pub enum FileSizeError {
    #[error("Failed to write file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to generate plot: {0}")]
    PlotGeneration(#[from] PlotError),
}

type Result<T> = core::result::Result<T, FileSizeError>;

/// A file singled out by its size
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedSize {
    pub filename: String,
    pub size: u64,
}

impl NamedSize {
    fn of(record: &FileRecord) -> Self {
        Self {
            filename: record.filename.clone(),
            size: record.size,
        }
    }
}

/// Size statistics of the regular files in a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeStatistics {
    /// Mean, median, mode and spread over every regular file entry
    pub summary: Option<Summary<u64>>,
    /// Regular files after deduplicating on filename
    pub unique_regular_files: usize,
    /// Aggregate size of the unique regular files, saturating at `u64::MAX`
    pub unique_total_bytes: u64,
    /// Zero-byte unique regular files
    pub empty_files: usize,
    pub largest: Option<NamedSize>,
    /// Smallest unique regular file with a non-zero size
    pub smallest_non_empty: Option<NamedSize>,
}

/// Regular files with duplicate filenames removed, keeping the first occurrence
pub fn unique_regular_files(records: &[FileRecord]) -> Vec<&FileRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .filter(|record| record.is_regular())
        .filter(|record| seen.insert(record.filename.as_str()))
        .collect()
}

/// Sizes of every regular file entry, in listing order
pub fn regular_file_sizes(listing: &ParsedListing) -> Vec<u64> {
    listing.regular_files().map(|record| record.size).collect()
}

/// Computes [`SizeStatistics`] for a set of records
///
/// Extremes take the first file in listing order when several share a size.
pub fn compute_size_statistics(records: &[FileRecord]) -> SizeStatistics {
    let sizes: Vec<u64> = records
        .iter()
        .filter(|record| record.is_regular())
        .map(|record| record.size)
        .collect();

    let unique = unique_regular_files(records);

    let mut largest: Option<&FileRecord> = None;
    let mut smallest_non_empty: Option<&FileRecord> = None;
    for &record in &unique {
        if largest.map_or(true, |current| record.size > current.size) {
            largest = Some(record);
        }
        if record.size > 0
            && smallest_non_empty.map_or(true, |current| record.size < current.size)
        {
            smallest_non_empty = Some(record);
        }
    }

    SizeStatistics {
        summary: Summary::of(&sizes),
        unique_regular_files: unique.len(),
        unique_total_bytes: unique
            .iter()
            .fold(0u64, |total, record| total.saturating_add(record.size)),
        empty_files: unique.iter().filter(|record| record.size == 0).count(),
        largest: largest.map(NamedSize::of),
        smallest_non_empty: smallest_non_empty.map(NamedSize::of),
    }
}

/// Report ranges for file sizes, in decimal units
const SIZE_RANGES: [BucketRange<u64>; 8] = [
    BucketRange::new("Empty", 0, 0),
    BucketRange::new("<1KB", 1, KB - 1),
    BucketRange::new("1KB-10KB", KB, 10 * KB - 1),
    BucketRange::new("10KB-100KB", 10 * KB, 100 * KB - 1),
    BucketRange::new("100KB-1MB", 100 * KB, MB - 1),
    BucketRange::new("1MB-10MB", MB, 10 * MB - 1),
    BucketRange::new("10MB-1GB", 10 * MB, GB - 1),
    BucketRange::new("1GB+", GB, u64::MAX),
];

fn create_file_size_buckets(sizes: &[u64]) -> Vec<BucketRow> {
    count_into_buckets(sizes, &SIZE_RANGES)
}

/// Renders the plain-text size report
fn format_size_report(statistics: &SizeStatistics, buckets: &[BucketRow]) -> String {
    let mut output = String::new();
    output.push_str("File Size Analysis\n");
    output.push_str(&"=".repeat(18));
    output.push_str("\n\n");
    output.push_str(&format_bucket_table(
        "File Size Distribution (Fixed Ranges)",
        buckets,
    ));
    output.push_str("\n\n");

    output.push_str("Unique Regular Files\n");
    output.push_str(&"=".repeat(20));
    output.push('\n');
    output.push_str(&format!(
        "Number of different unique regular files: {}\n",
        statistics.unique_regular_files
    ));
    output.push_str(&format!(
        "Aggregate size of unique regular files: {} bytes ({})\n",
        statistics.unique_total_bytes,
        ByteSize(statistics.unique_total_bytes)
    ));
    match &statistics.largest {
        Some(largest) => output.push_str(&format!(
            "Largest file: {} with size {} bytes\n",
            largest.filename, largest.size
        )),
        None => output.push_str("Largest file: none\n"),
    }
    output.push_str(&format!(
        "Number of empty files: {}\n",
        statistics.empty_files
    ));
    match &statistics.smallest_non_empty {
        Some(smallest) => output.push_str(&format!(
            "Smallest non-empty file: {} with size {} bytes\n",
            smallest.filename, smallest.size
        )),
        None => output.push_str("No non-empty files found.\n"),
    }

    output.push('\n');
    output.push_str("Summary\n");
    output.push_str(&"=".repeat(7));
    output.push('\n');
    match &statistics.summary {
        Some(summary) => {
            output.push_str(&format!("Total regular files: {}\n", summary.count));
            output.push_str(&format!("Mean file size: {:.2} bytes\n", summary.mean));
            match summary.std_dev {
                Some(std_dev) => output.push_str(&format!(
                    "Standard deviation of file size: {:.2} bytes\n",
                    std_dev
                )),
                None => output.push_str("Standard deviation of file size: undefined\n"),
            }
            output.push_str(&format!("Median file size: {:.2} bytes\n", summary.median));
            output.push_str(&format!("Mode file size: {} bytes", summary.mode));
        }
        None => output.push_str("No regular files found."),
    }

    output
}

/// Generate complete file size analysis
///
/// Computes [`SizeStatistics`] over the regular files of the listing and saves the
/// bucket table, extremes and summary statistics to file-size.txt.
///
/// # Arguments
/// * `listing` - The parsed listing
/// * `output_dir` - Directory where the analysis file should be saved
///
/// # Returns
/// * `Ok(SizeStatistics)` - The computed statistics, for the JSON summary
/// * `Err(FileSizeError)` - If file operations failed
pub fn generate_file_size_analysis(
    listing: &ParsedListing,
    output_dir: &Path,
) -> Result<SizeStatistics> {
    let statistics = compute_size_statistics(&listing.records);
    let buckets = create_file_size_buckets(&regular_file_sizes(listing));

    fs::write(
        output_dir.join("file-size.txt"),
        format_size_report(&statistics, &buckets),
    )?;

    if let Some(summary) = &statistics.summary {
        info!(
            listing = %listing.label,
            unique_files = statistics.unique_regular_files,
            mean = summary.mean,
            median = summary.median,
            mode = summary.mode,
            "File size analysis complete"
        );
    }

    Ok(statistics)
}

/// Size PDF and CDF series of the regular files in a listing
///
/// Returns `None` when the listing has no regular files.
pub fn size_distribution_series(listing: &ParsedListing) -> Option<(PlotSeries, PlotSeries)> {
    let sizes = regular_file_sizes(listing);
    if sizes.is_empty() {
        return None;
    }

    let mass = probability_mass(&sizes);
    let cumulative = cumulative_mass(&mass);

    Some((
        PlotSeries::from_samples(listing.label.as_str(), &mass),
        PlotSeries::from_samples(listing.label.as_str(), &cumulative),
    ))
}

/// Generate file size distribution plots
///
/// Creates the size distribution plots of a listing:
/// - `pdf_plot.png` - Probability of each distinct file size
/// - `cdf_plot.png` - Cumulative probability over file sizes
///
/// # Arguments
/// * `listing` - The parsed listing
/// * `output_dir` - Directory where PNG files should be saved
///
/// # Returns
/// * `Ok(())` - If both plots were generated, or there was nothing to plot
/// * `Err(FileSizeError)` - If plot generation failed
pub fn generate_file_size_plots(listing: &ParsedListing, output_dir: &Path) -> Result<()> {
    let Some((pdf, cdf)) = size_distribution_series(listing) else {
        warn!(listing = %listing.label, "No regular files, skipping size plots");
        return Ok(());
    };

    create_size_pdf_plot(&[pdf], &output_dir.join("pdf_plot.png"))?;
    create_size_cdf_plot(&[cdf], "CDF", &output_dir.join("cdf_plot.png"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::data_structures::SkipSummary;

    fn entry(permissions: &str, size: u64, filename: &str) -> FileRecord {
        FileRecord {
            permissions: permissions.to_string(),
            links: "1".to_string(),
            owner: "www".to_string(),
            group: "staff".to_string(),
            size,
            month: "Jan".to_string(),
            day: 1,
            year: 2007,
            time: None,
            filename: filename.to_string(),
        }
    }

    fn file(size: u64, filename: &str) -> FileRecord {
        entry("-rw-r--r--", size, filename)
    }

    fn listing(records: Vec<FileRecord>) -> ParsedListing {
        ParsedListing {
            label: "test".to_string(),
            lines_read: records.len(),
            records,
            skipped: SkipSummary::default(),
        }
    }

    #[test]
    fn test_unique_regular_files_keeps_first_occurrence() {
        let records = vec![
            file(10, "index.html"),
            entry("drwxr-xr-x", 4096, "papers"),
            file(20, "index.html"),
            file(30, "paper.pdf"),
        ];
        let unique = unique_regular_files(&records);

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].size, 10);
        assert_eq!(unique[1].filename, "paper.pdf");
    }

    #[test]
    fn test_empty_files_are_counted_but_not_smallest() {
        let records = vec![
            file(0, "empty.txt"),
            file(512, "notes.txt"),
            file(4096, "report.pdf"),
            file(512, "other.txt"),
        ];
        let statistics = compute_size_statistics(&records);

        assert_eq!(statistics.empty_files, 1);
        assert_eq!(
            statistics.smallest_non_empty,
            Some(NamedSize {
                filename: "notes.txt".to_string(),
                size: 512
            })
        );
        assert_eq!(statistics.largest.as_ref().unwrap().filename, "report.pdf");
        assert_eq!(statistics.unique_regular_files, 4);
        assert_eq!(statistics.unique_total_bytes, 5120);

        let summary = statistics.summary.unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 1280.0);
        assert_eq!(summary.median, 512.0);
        assert_eq!(summary.mode, 512);
    }

    #[test]
    fn test_total_bytes_saturate() {
        let records = vec![file(u64::MAX, "a.bin"), file(u64::MAX, "b.bin")];
        let statistics = compute_size_statistics(&records);

        assert_eq!(statistics.unique_total_bytes, u64::MAX);
        assert_eq!(statistics.largest.unwrap().filename, "a.bin");
        assert_eq!(statistics.summary.unwrap().mean, u64::MAX as f64);
    }

    #[test]
    fn test_directories_are_excluded_from_statistics() {
        let records = vec![entry("drwxr-xr-x", 1_000_000, "big dir"), file(100, "a.txt")];
        let statistics = compute_size_statistics(&records);

        assert_eq!(statistics.summary.as_ref().unwrap().count, 1);
        assert_eq!(statistics.largest.unwrap().size, 100);
    }

    #[test]
    fn test_no_regular_files() {
        let statistics = compute_size_statistics(&[entry("drwxr-xr-x", 4096, "papers")]);
        assert_eq!(statistics.summary, None);
        assert_eq!(statistics.largest, None);
        assert_eq!(statistics.smallest_non_empty, None);
        assert_eq!(statistics.unique_regular_files, 0);
    }

    #[test]
    fn test_only_empty_files_have_no_smallest_non_empty() {
        let statistics = compute_size_statistics(&[file(0, "a"), file(0, "b")]);
        assert_eq!(statistics.empty_files, 2);
        assert_eq!(statistics.smallest_non_empty, None);
        assert_eq!(statistics.largest.unwrap().filename, "a");
    }

    #[test]
    fn test_create_file_size_buckets() {
        let data = vec![0, 500, 2048, 50_000, 500_000, 5_000_000, 50_000_000, 5_000_000_000];
        let buckets = create_file_size_buckets(&data);

        assert_eq!(buckets.len(), 8);
        assert_eq!(buckets[0].label, "Empty");
        assert!(buckets.iter().all(|bucket| bucket.files == 1));
        assert_eq!(buckets[7].label, "1GB+");
    }

    #[test]
    fn test_size_distribution_series() {
        let parsed = listing(vec![
            file(10, "a"),
            file(10, "b"),
            file(1000, "c"),
            file(100, "d"),
            entry("drwxr-xr-x", 4096, "dir"),
        ]);
        let (pdf, cdf) = size_distribution_series(&parsed).unwrap();

        assert_eq!(pdf.points, vec![(10.0, 0.5), (100.0, 0.25), (1000.0, 0.25)]);
        assert_eq!(cdf.points.len(), 3);
        assert!((cdf.points.last().unwrap().1 - 1.0).abs() < 1e-9);

        assert!(size_distribution_series(&listing(vec![])).is_none());
    }

    #[test]
    fn test_generate_file_size_analysis_writes_report() {
        let temp_dir = tempfile::tempdir().unwrap();
        let parsed = listing(vec![file(0, "empty.txt"), file(4096, "report.pdf")]);

        let statistics = generate_file_size_analysis(&parsed, temp_dir.path()).unwrap();
        assert_eq!(statistics.unique_regular_files, 2);

        let report = fs::read_to_string(temp_dir.path().join("file-size.txt")).unwrap();
        assert!(report.contains("File Size Distribution (Fixed Ranges)"));
        assert!(report.contains("Largest file: report.pdf with size 4096 bytes"));
        assert!(report.contains("Number of empty files: 1"));
        assert!(report.contains("Smallest non-empty file: report.pdf with size 4096 bytes"));
        assert!(report.contains("Mode file size: 0 bytes"));
    }
}
