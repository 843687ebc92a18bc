//! Listing parsing functionality
//!
//! This module turns the lines of a long-format directory listing
//! (`permissions links owner group size month day year-or-time filename`)
//! into [`FileRecord`]s. Lines that are not file entries, or that are
//! malformed, come back as a [`SkipReason`] rather than an error.

use crate::common::data_structures::{FileRecord, ParsedListing, SkipSummary};
use crate::config::ListingInput;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use zstd::Decoder;

/// Number of positional tokens before the filename
///
/// A line holding exactly these tokens is still a record, with an empty filename.
const POSITIONAL_FIELDS: usize = 8;

/// Errors that can occur while loading a listing file
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to decompress zstd file: {0}")]
    Decompression(String),
}

type Result<T> = core::result::Result<T, ParsingError>;

/// Why a line did not produce a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    /// Empty or whitespace-only line
    BlankLine,
    /// `.`, `..`, `.:`, `./dir:` headers and `total N` summary lines
    DirectoryMarker,
    /// Fewer tokens than the positional fields
    InsufficientFields,
    /// Size column is not a non-negative integer
    InvalidSize,
    /// Day column is not an integer
    InvalidDay,
    /// Year column holds neither a time nor an integer year
    InvalidYear,
}

impl SkipReason {
    /// Whether the line looked like a file entry but could not be read
    pub fn is_malformed(self) -> bool {
        !matches!(self, SkipReason::BlankLine | SkipReason::DirectoryMarker)
    }

    fn describe(self) -> &'static str {
        match self {
            SkipReason::BlankLine => "blank line",
            SkipReason::DirectoryMarker => "directory marker",
            SkipReason::InsufficientFields => "insufficient fields",
            SkipReason::InvalidSize => "invalid size",
            SkipReason::InvalidDay => "invalid day",
            SkipReason::InvalidYear => "invalid year",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

impl SkipSummary {
    fn record(&mut self, reason: SkipReason) {
        let slot = match reason {
            SkipReason::BlankLine => &mut self.blank_lines,
            SkipReason::DirectoryMarker => &mut self.directory_markers,
            SkipReason::InsufficientFields => &mut self.insufficient_fields,
            SkipReason::InvalidSize => &mut self.invalid_size,
            SkipReason::InvalidDay => &mut self.invalid_day,
            SkipReason::InvalidYear => &mut self.invalid_year,
        };
        *slot += 1;
    }
}

/// Outcome of parsing a single listing line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Record(FileRecord),
    Skip(SkipReason),
}

/// Line parser for long-format directory listings
#[derive(Debug, Clone, Copy)]
pub struct ListingParser {
    /// Year used when the listing shows `HH:MM` instead of a year
    synthetic_year: i32,
}

impl ListingParser {
    pub fn new(synthetic_year: i32) -> Self {
        Self { synthetic_year }
    }

    pub fn synthetic_year(&self) -> i32 {
        self.synthetic_year
    }

    /// Parses one line of a listing
    ///
    /// Rules are applied in order: blank lines, then directory markers and
    /// `total` lines, then the field count, then size, day and year. The
    /// filename is every token after the year column joined by single spaces.
    pub fn parse_line(&self, line: &str) -> ParsedLine {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let Some(&first) = tokens.first() else {
            return ParsedLine::Skip(SkipReason::BlankLine);
        };

        if is_directory_marker(first) {
            return ParsedLine::Skip(SkipReason::DirectoryMarker);
        }

        if tokens.len() < POSITIONAL_FIELDS {
            return ParsedLine::Skip(SkipReason::InsufficientFields);
        }

        let Ok(size) = tokens[4].parse::<u64>() else {
            return ParsedLine::Skip(SkipReason::InvalidSize);
        };

        let Ok(day) = tokens[6].parse::<u32>() else {
            return ParsedLine::Skip(SkipReason::InvalidDay);
        };

        let year_or_time = tokens[7];
        let (year, time) = if year_or_time.contains(':') {
            (self.synthetic_year, Some(year_or_time.to_string()))
        } else {
            match year_or_time.parse::<i32>() {
                Ok(year) => (year, None),
                Err(_) => return ParsedLine::Skip(SkipReason::InvalidYear),
            }
        };

        ParsedLine::Record(FileRecord {
            permissions: tokens[0].to_string(),
            links: tokens[1].to_string(),
            owner: tokens[2].to_string(),
            group: tokens[3].to_string(),
            size,
            month: tokens[5].to_string(),
            day,
            year,
            time,
            filename: tokens[POSITIONAL_FIELDS..].join(" "),
        })
    }

    /// Parses every line from a reader into a [`ParsedListing`]
    ///
    /// Malformed lines are reported with their line number and skipped.
    /// Invalid UTF-8 is replaced lossily so foreign-encoded filenames do not
    /// stop the run.
    pub fn parse_reader<R: BufRead>(&self, label: &str, mut reader: R) -> Result<ParsedListing> {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::with_template("{spinner} {msg} {pos} lines")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.set_message(format!("Parsing {}", label));
        progress.enable_steady_tick(Duration::from_millis(100));

        let mut records = Vec::new();
        let mut skipped = SkipSummary::default();
        let mut lines_read = 0usize;
        let mut buffer = Vec::new();

        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            lines_read += 1;
            progress.inc(1);

            let line = String::from_utf8_lossy(&buffer);
            let line = line.trim_end_matches(['\n', '\r']);

            match self.parse_line(line) {
                ParsedLine::Record(record) => records.push(record),
                ParsedLine::Skip(reason) => {
                    if reason.is_malformed() {
                        warn!(
                            listing = label,
                            line_number = lines_read,
                            %reason,
                            "Error parsing line: {}",
                            line
                        );
                    } else {
                        debug!(listing = label, line_number = lines_read, %reason, "Skipped line");
                    }
                    skipped.record(reason);
                }
            }
        }

        progress.finish_and_clear();

        info!(
            listing = label,
            lines = lines_read,
            records = records.len(),
            skipped = skipped.total(),
            malformed = skipped.malformed(),
            "Parsed listing"
        );

        Ok(ParsedListing {
            label: label.to_string(),
            records,
            skipped,
            lines_read,
        })
    }
}

/// First tokens that mark recursive-listing headers and summary lines
fn is_directory_marker(first_token: &str) -> bool {
    matches!(first_token, "." | ".." | ".:" | "total") || first_token.starts_with("./")
}

/// Load and parse a listing file
///
/// Files ending in `.zst` are decompressed on the fly with a ZStandard decoder.
///
/// # Arguments
/// * `input` - Listing path and label
/// * `parser` - Parser configured with the run's synthetic year
///
/// # Returns
/// * `Ok(ParsedListing)` - Records and skip tallies of the listing
/// * `Err(ParsingError)` - If the file could not be opened, read or decompressed
pub fn parse_listing(input: &ListingInput, parser: &ListingParser) -> Result<ParsedListing> {
    let reader = open_listing(&input.path)?;
    parser.parse_reader(&input.label, reader)
}

fn open_listing(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path)?;

    let source: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "zst") {
        let decoder = Decoder::new(file).map_err(|e| {
            ParsingError::Decompression(format!("Failed to create decoder: {}", e))
        })?;
        Box::new(decoder)
    } else {
        Box::new(file)
    };

    Ok(BufReader::new(source))
}
