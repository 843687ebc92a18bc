//! Fixed-range histograms for the plain-text reports
//!
//! Size and age reports both show how many regular files fall into a handful
//! of human-sized ranges. The ranges are declared next to the analysis that
//! owns them as [`BucketRange`]s; this module counts values into them and
//! renders the result with [`tabled`].

use serde::Serialize;
use tabled::{Table, Tabled};

/// Inclusive `min..=max` range with the label printed in the report
#[derive(Debug, Clone, Copy)]
pub struct BucketRange<T> {
    pub label: &'static str,
    pub min: T,
    pub max: T,
}

impl<T> BucketRange<T> {
    pub const fn new(label: &'static str, min: T, max: T) -> Self {
        Self { label, min, max }
    }
}

/// One line of a histogram table
#[derive(Debug, Clone, PartialEq, Eq, Tabled, Serialize)]
pub struct BucketRow {
    #[tabled(rename = "Range")]
    pub label: String,
    #[tabled(rename = "Files")]
    pub files: usize,
    /// Share of all counted values, formatted as `12.34%`
    #[tabled(rename = "Share")]
    pub share: String,
}

/// Counts values into each range
///
/// Shares are relative to every value passed in, so values outside all
/// ranges lower the shares rather than disappearing silently.
pub fn count_into_buckets<T: Copy + PartialOrd>(
    values: &[T],
    ranges: &[BucketRange<T>],
) -> Vec<BucketRow> {
    let total = values.len();

    ranges
        .iter()
        .map(|range| {
            let files = values
                .iter()
                .filter(|&&value| range.min <= value && value <= range.max)
                .count();
            let share = match total {
                0 => 0.0,
                total => files as f64 / total as f64 * 100.0,
            };

            BucketRow {
                label: range.label.to_string(),
                files,
                share: format!("{:.2}%", share),
            }
        })
        .collect()
}

/// Renders a histogram below an underlined title
pub fn format_bucket_table(title: &str, rows: &[BucketRow]) -> String {
    let body = if rows.iter().all(|row| row.files == 0) {
        "No regular files in any range".to_string()
    } else {
        Table::new(rows).to_string()
    };

    format!("{}\n{}\n{}", title, "=".repeat(title.len()), body)
}
