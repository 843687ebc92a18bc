//! Run configuration
//!
//! Command line arguments are validated into an [`AnalysisConfig`] before any
//! listing is read, so that a bad argument never leaves partial output behind.

use crate::analysis::constants::DEFAULT_TOP_EXTENSIONS;
use chrono::{Datelike, Local, NaiveDate};
use hashbrown::HashSet;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while validating the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("At least one input listing is required")]
    NoInputs,

    #[error("Input file does not exist: {0}")]
    MissingInput(PathBuf),

    #[error("Invalid reference date '{0}', expected YYYY-MM-DD")]
    InvalidReferenceDate(String),

    #[error("Two inputs share the label '{0}'")]
    DuplicateLabel(String),

    #[error("Extension table length must be at least 1")]
    InvalidTopCount,

    #[error("Year offset {0} exceeds the maximum of {max}", max = MAX_YEAR_OFFSET)]
    InvalidYearOffset(u32),
}

/// Largest accepted `--year-offset`
pub const MAX_YEAR_OFFSET: u32 = 100;

type Result<T> = core::result::Result<T, ConfigError>;

/// Year substituted when a listing shows a clock time instead of a year
///
/// `ls` prints `HH:MM` for files modified within the last six months, which
/// does not say which year that was. One policy is picked per run and applied
/// to every line of every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticYear {
    /// Year of the reference date
    CurrentYear,
    /// Year of the reference date minus a fixed number of years, for dumps
    /// taken long before the analysis runs
    YearsBeforeCurrent(u32),
}

impl SyntheticYear {
    pub fn from_offset(offset: u32) -> Self {
        match offset {
            0 => SyntheticYear::CurrentYear,
            n => SyntheticYear::YearsBeforeCurrent(n),
        }
    }

    /// Resolves the policy against the run's reference date
    pub fn resolve(self, reference_date: NaiveDate) -> i32 {
        match self {
            SyntheticYear::CurrentYear => reference_date.year(),
            SyntheticYear::YearsBeforeCurrent(n) => reference_date
                .year()
                .saturating_sub(i32::try_from(n).unwrap_or(i32::MAX)),
        }
    }
}

/// A listing file together with the label used for its outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingInput {
    pub label: String,
    pub path: PathBuf,
}

impl ListingInput {
    /// Labels a listing with its file stem, dropping a trailing `.zst` first
    pub fn from_path(path: PathBuf) -> Self {
        let mut stem_source = path.clone();
        if stem_source.extension().is_some_and(|ext| ext == "zst") {
            stem_source.set_extension("");
        }

        let label = stem_source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "listing".to_string());

        Self { label, path }
    }
}

/// Validated settings for a single run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub inputs: Vec<ListingInput>,
    pub output_dir: PathBuf,
    /// "Now" for file age computation
    pub reference_date: NaiveDate,
    pub synthetic_year: SyntheticYear,
    /// Number of known extensions kept in the file type table
    pub top_extensions: usize,
    pub render_plots: bool,
}

impl AnalysisConfig {
    /// Builds a configuration with default settings for the given inputs
    pub fn new(inputs: Vec<PathBuf>, output_dir: PathBuf) -> Self {
        Self {
            inputs: inputs.into_iter().map(ListingInput::from_path).collect(),
            output_dir,
            reference_date: Local::now().date_naive(),
            synthetic_year: SyntheticYear::CurrentYear,
            top_extensions: DEFAULT_TOP_EXTENSIONS,
            render_plots: true,
        }
    }

    /// Parses a `YYYY-MM-DD` reference date
    pub fn parse_reference_date(value: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| ConfigError::InvalidReferenceDate(value.to_string()))
    }

    /// Year placed into records whose listing line held a time
    pub fn resolved_synthetic_year(&self) -> i32 {
        self.synthetic_year.resolve(self.reference_date)
    }

    /// Checks that inputs exist and are uniquely labelled
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(ConfigError::NoInputs);
        }

        if self.top_extensions == 0 {
            return Err(ConfigError::InvalidTopCount);
        }

        if let SyntheticYear::YearsBeforeCurrent(n) = self.synthetic_year {
            if n > MAX_YEAR_OFFSET {
                return Err(ConfigError::InvalidYearOffset(n));
            }
        }

        let mut labels = HashSet::with_capacity(self.inputs.len());
        for input in &self.inputs {
            if !input.path.is_file() {
                return Err(ConfigError::MissingInput(input.path.clone()));
            }
            if !labels.insert(input.label.as_str()) {
                return Err(ConfigError::DuplicateLabel(input.label.clone()));
            }
        }

        Ok(())
    }

    /// Directory receiving the outputs of one listing
    ///
    /// A single listing writes straight into the output directory; several
    /// listings each get a subdirectory named after their label.
    pub fn listing_output_dir(&self, label: &str) -> PathBuf {
        if self.inputs.len() > 1 {
            self.output_dir.join(label)
        } else {
            self.output_dir.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn synthetic_year_resolves_against_reference_date() {
        let today = date(2024, 6, 1);
        assert_eq!(SyntheticYear::CurrentYear.resolve(today), 2024);
        assert_eq!(SyntheticYear::YearsBeforeCurrent(14).resolve(today), 2010);
        assert_eq!(SyntheticYear::from_offset(0), SyntheticYear::CurrentYear);
        assert_eq!(
            SyntheticYear::from_offset(3),
            SyntheticYear::YearsBeforeCurrent(3)
        );
    }

    #[test]
    fn labels_come_from_file_stem() {
        let plain = ListingInput::from_path(PathBuf::from("txt/paperdata.txt"));
        assert_eq!(plain.label, "paperdata");

        let compressed = ListingInput::from_path(PathBuf::from("txt/www2007data.txt.zst"));
        assert_eq!(compressed.label, "www2007data");
    }

    #[test]
    fn reference_date_parsing() {
        assert_eq!(
            AnalysisConfig::parse_reference_date("2024-02-29").unwrap(),
            date(2024, 2, 29)
        );
        assert!(matches!(
            AnalysisConfig::parse_reference_date("2023-02-29"),
            Err(ConfigError::InvalidReferenceDate(_))
        ));
    }

    #[test]
    fn validate_rejects_bad_configurations() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("out");

        let config = AnalysisConfig::new(vec![], output.clone());
        assert!(matches!(config.validate(), Err(ConfigError::NoInputs)));

        let missing = temp_dir.path().join("missing.txt");
        let config = AnalysisConfig::new(vec![missing], output.clone());
        assert!(matches!(config.validate(), Err(ConfigError::MissingInput(_))));

        let first = temp_dir.path().join("a").join("data.txt");
        let second = temp_dir.path().join("b").join("data.txt");
        for path in [&first, &second] {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        let config = AnalysisConfig::new(vec![first.clone(), second], output.clone());
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateLabel(_))));

        let mut config = AnalysisConfig::new(vec![first], output);
        assert!(config.validate().is_ok());
        config.top_extensions = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTopCount)));
    }

    #[test]
    fn validate_bounds_year_offset() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("paperdata.txt");
        fs::write(&input, "").unwrap();

        let mut config = AnalysisConfig::new(vec![input], temp_dir.path().join("out"));
        config.synthetic_year = SyntheticYear::from_offset(MAX_YEAR_OFFSET);
        assert!(config.validate().is_ok());

        config.synthetic_year = SyntheticYear::from_offset(3_000_000_000);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidYearOffset(3_000_000_000))
        ));
    }

    #[test]
    fn huge_offset_resolves_without_wrapping() {
        let year = SyntheticYear::YearsBeforeCurrent(u32::MAX).resolve(date(2024, 6, 1));
        assert_eq!(year, 2024 - i32::MAX);
    }

    #[test]
    fn output_dir_is_split_per_listing_only_when_needed() {
        let single = AnalysisConfig::new(vec![PathBuf::from("a.txt")], PathBuf::from("out"));
        assert_eq!(single.listing_output_dir("a"), PathBuf::from("out"));

        let multiple = AnalysisConfig::new(
            vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")],
            PathBuf::from("out"),
        );
        assert_eq!(multiple.listing_output_dir("b"), PathBuf::from("out/b"));
    }
}
