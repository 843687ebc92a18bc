//! File type analysis functionality
//!
//! Groups regular files by extension and reports each group's share of the
//! file count and of the total bytes.

use super::constants::UNKNOWN_EXTENSION;
use crate::common::csv_output::{write_rows, CsvOutputError};
use crate::common::data_structures::AnnotatedRecord;
use hashbrown::HashMap;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tabled::{Table, Tabled};
use thiserror::Error;
use tracing::info;

/// Errors that can occur during file type analysis
#[derive(Error, Debug)]
pub enum FileTypeError {
    #[error("Failed to write file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] CsvOutputError),
}

type Result<T> = core::result::Result<T, FileTypeError>;

/// Count and size of the files sharing one extension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionShare {
    pub extension: String,
    pub file_count: usize,
    pub total_size: u64,
    /// Share of all grouped files, 0.0 to 1.0
    pub file_share: f64,
    /// Share of all grouped bytes, 0.0 to 1.0
    pub size_share: f64,
}

/// Per-extension groups of a listing
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionDistribution {
    /// Every group, including [`UNKNOWN_EXTENSION`], by count descending
    pub groups: Vec<ExtensionShare>,
    pub total_files: usize,
    /// Saturates at `u64::MAX`, as does each group's `total_size`
    pub total_bytes: u64,
}

impl ExtensionDistribution {
    /// The `limit` most common known extensions
    pub fn top_known(&self, limit: usize) -> Vec<&ExtensionShare> {
        self.groups
            .iter()
            .filter(|group| group.extension != UNKNOWN_EXTENSION)
            .take(limit)
            .collect()
    }
}

fn saturate(bytes: u128) -> u64 {
    u64::try_from(bytes).unwrap_or(u64::MAX)
}

/// Groups regular files by extension
///
/// Shares are fractions of all grouped files and bytes, [`UNKNOWN_EXTENSION`]
/// included. Groups are sorted by file count descending, then by extension.
pub fn group_by_extension(records: &[AnnotatedRecord<'_>]) -> ExtensionDistribution {
    // Byte totals of many near-u64::MAX sizes exceed u64
    let mut totals: HashMap<&str, (usize, u128)> = HashMap::new();
    let mut total_files = 0usize;
    let mut total_bytes = 0u128;

    for annotated in records.iter().filter(|annotated| annotated.record.is_regular()) {
        let entry = totals.entry(annotated.extension.as_str()).or_default();
        entry.0 += 1;
        entry.1 += u128::from(annotated.record.size);
        total_files += 1;
        total_bytes += u128::from(annotated.record.size);
    }

    let share = |part: f64, whole: f64| if whole == 0.0 { 0.0 } else { part / whole };

    let mut groups: Vec<ExtensionShare> = totals
        .into_iter()
        .map(|(extension, (file_count, total_size))| ExtensionShare {
            extension: extension.to_string(),
            file_count,
            total_size: saturate(total_size),
            file_share: share(file_count as f64, total_files as f64),
            size_share: share(total_size as f64, total_bytes as f64),
        })
        .collect();

    groups.sort_by(|a, b| {
        b.file_count
            .cmp(&a.file_count)
            .then_with(|| a.extension.cmp(&b.extension))
    });

    ExtensionDistribution {
        groups,
        total_files,
        total_bytes: saturate(total_bytes),
    }
}

/// Column names of `file_type_distribution.csv`, in [`ExtensionRow`] field order
const EXTENSION_HEADER: [&str; 5] = [
    "extension",
    "file_count",
    "total_size",
    "file_percentage",
    "size_percentage",
];

/// Row of `file_type_distribution.csv` and of the file-type.txt table
#[derive(Debug, Serialize, Tabled)]
struct ExtensionRow<'a> {
    #[tabled(rename = "Extension")]
    extension: &'a str,
    #[tabled(rename = "Files")]
    file_count: usize,
    #[tabled(rename = "Total Size")]
    total_size: u64,
    #[tabled(rename = "File %")]
    file_percentage: String,
    #[tabled(rename = "Size %")]
    size_percentage: String,
}

impl<'a> From<&'a ExtensionShare> for ExtensionRow<'a> {
    fn from(share: &'a ExtensionShare) -> Self {
        Self {
            extension: &share.extension,
            file_count: share.file_count,
            total_size: share.total_size,
            file_percentage: format!("{:.2}%", share.file_share * 100.0),
            size_percentage: format!("{:.2}%", share.size_share * 100.0),
        }
    }
}

/// Generate the file type analysis
///
/// Saves the `top` most common known extensions to
/// `file_type_distribution.csv` and file-type.txt.
///
/// # Arguments
/// * `label` - Listing label, for log output
/// * `records` - Annotated records of the listing
/// * `top` - Number of known extensions to keep
/// * `output_dir` - Directory where the outputs should be saved
///
/// # Returns
/// * `Ok(Vec<ExtensionShare>)` - The kept extensions, for the JSON summary
/// * `Err(FileTypeError)` - If file operations failed
pub fn generate_file_type_analysis(
    label: &str,
    records: &[AnnotatedRecord<'_>],
    top: usize,
    output_dir: &Path,
) -> Result<Vec<ExtensionShare>> {
    let distribution = group_by_extension(records);
    let top_types = distribution.top_known(top);

    write_rows(
        &EXTENSION_HEADER,
        top_types.iter().map(|&share| ExtensionRow::from(share)),
        &output_dir.join("file_type_distribution.csv"),
    )?;

    let title = format!("Top {} File Types", top);
    let table = Table::new(top_types.iter().map(|&share| ExtensionRow::from(share))).to_string();
    let output = format!(
        "File Type Analysis\n{}\n\n{}\n{}\n{}\n\nSummary\n{}\nTotal file num: {}\nTotal file bytes: {}\nDistinct extensions: {}",
        "=".repeat(18),
        title,
        "=".repeat(title.len()),
        table,
        "=".repeat(7),
        distribution.total_files,
        distribution.total_bytes,
        distribution.groups.len()
    );
    fs::write(output_dir.join("file-type.txt"), output)?;

    info!(
        listing = label,
        total_files = distribution.total_files,
        extensions = distribution.groups.len(),
        "File type analysis complete"
    );

    Ok(top_types.into_iter().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::derived_columns::annotate;
    use crate::common::data_structures::FileRecord;
    use chrono::NaiveDate;

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

    fn sample_records() -> Vec<FileRecord> {
        vec![
            entry("-rw-r--r--", 100, "index.html"),
            entry("-rw-r--r--", 300, "about.HTML"),
            entry("-rw-r--r--", 4000, "paper.pdf"),
            entry("-rw-r--r--", 500, "README"),
            entry("-rw-r--r--", 100, "style.css"),
            entry("drwxr-xr-x", 4096, "images.d"),
        ]
    }

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_group_by_extension() {
        let records = sample_records();
        let annotated = annotate(&records, reference());
        let distribution = group_by_extension(&annotated);

        assert_eq!(distribution.total_files, 5);
        assert_eq!(distribution.total_bytes, 5000);

        let extensions: Vec<&str> = distribution
            .groups
            .iter()
            .map(|group| group.extension.as_str())
            .collect();
        assert_eq!(extensions, vec!["html", "Unknown", "css", "pdf"]);

        let html = &distribution.groups[0];
        assert_eq!(html.file_count, 2);
        assert_eq!(html.total_size, 400);
        assert!((html.file_share - 0.4).abs() < 1e-12);
        assert!((html.size_share - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_file_counts_sum_to_grouped_records() {
        let records = sample_records();
        let annotated = annotate(&records, reference());
        let distribution = group_by_extension(&annotated);

        let counted: usize = distribution.groups.iter().map(|group| group.file_count).sum();
        let regular = records.iter().filter(|record| record.is_regular()).count();
        assert_eq!(counted, regular);

        let shares: f64 = distribution.groups.iter().map(|group| group.file_share).sum();
        assert!((shares - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_known_excludes_unknown() {
        let records = sample_records();
        let annotated = annotate(&records, reference());
        let distribution = group_by_extension(&annotated);

        let top: Vec<&str> = distribution
            .top_known(2)
            .iter()
            .map(|group| group.extension.as_str())
            .collect();
        assert_eq!(top, vec!["html", "css"]);
    }

    #[test]
    fn test_huge_sizes_saturate_totals() {
        let records = vec![
            entry("-rw-r--r--", u64::MAX, "a.bin"),
            entry("-rw-r--r--", u64::MAX, "b.bin"),
            entry("-rw-r--r--", u64::MAX, "c.iso"),
        ];
        let annotated = annotate(&records, reference());
        let distribution = group_by_extension(&annotated);

        assert_eq!(distribution.total_bytes, u64::MAX);
        let bin = &distribution.groups[0];
        assert_eq!(bin.extension, "bin");
        assert_eq!(bin.total_size, u64::MAX);
        assert!((bin.size_share - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_only_unknown_extensions_write_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let records = vec![
            entry("-rw-r--r--", 10, "README"),
            entry("-rw-r--r--", 20, "LICENSE"),
        ];
        let annotated = annotate(&records, reference());

        let top = generate_file_type_analysis("test", &annotated, 10, temp_dir.path()).unwrap();
        assert!(top.is_empty());

        let csv = fs::read_to_string(temp_dir.path().join("file_type_distribution.csv")).unwrap();
        assert_eq!(
            csv.trim_end(),
            "extension,file_count,total_size,file_percentage,size_percentage"
        );
    }

    #[test]
    fn test_empty_distribution() {
        let distribution = group_by_extension(&[]);
        assert!(distribution.groups.is_empty());
        assert_eq!(distribution.total_files, 0);
        assert!(distribution.top_known(10).is_empty());
    }

    #[test]
    fn test_generate_file_type_analysis_writes_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let records = sample_records();
        let annotated = annotate(&records, reference());

        let top = generate_file_type_analysis("test", &annotated, 10, temp_dir.path()).unwrap();
        assert_eq!(top.len(), 3);

        let csv = fs::read_to_string(temp_dir.path().join("file_type_distribution.csv")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "extension,file_count,total_size,file_percentage,size_percentage"
        );
        assert_eq!(lines[1], "html,2,400,40.00%,8.00%");
        assert_eq!(lines.len(), 4);

        let report = fs::read_to_string(temp_dir.path().join("file-type.txt")).unwrap();
        assert!(report.contains("Top 10 File Types"));
        assert!(report.contains("Total file num: 5"));
    }
}
