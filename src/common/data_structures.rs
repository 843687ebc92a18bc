use chrono::NaiveDate;
use serde::Serialize;

/// Kind of entry, read from the leading character of the permission string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Leading `-`
    Regular,
    /// Leading `d`
    Directory,
    /// Symlinks, devices, sockets and anything else
    Other,
}

/// A single entry parsed from a long-format directory listing line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Permission string, e.g. `-rw-r--r--`
    pub permissions: String,
    /// Hard link count, kept as text
    pub links: String,
    pub owner: String,
    pub group: String,
    /// Size in bytes
    pub size: u64,
    /// Three-letter month abbreviation
    pub month: String,
    pub day: u32,
    /// Literal year from the listing, or the synthetic year when the listing showed a time
    pub year: i32,
    /// Clock time, only present when the year slot held one
    pub time: Option<String>,
    /// Rest of the line, may contain spaces
    pub filename: String,
}

impl FileRecord {
    pub fn kind(&self) -> EntryKind {
        match self.permissions.chars().next() {
            Some('-') => EntryKind::Regular,
            Some('d') => EntryKind::Directory,
            _ => EntryKind::Other,
        }
    }

    pub fn is_regular(&self) -> bool {
        self.kind() == EntryKind::Regular
    }
}

/// A [`FileRecord`] with the columns derived during aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedRecord<'a> {
    pub record: &'a FileRecord,
    /// `None` when year, month and day do not form a valid calendar date
    pub date: Option<NaiveDate>,
    /// Days between the reference date and [`Self::date`]
    pub file_age: Option<i64>,
    /// Lowercase extension, or [`UNKNOWN_EXTENSION`](crate::analysis::constants::UNKNOWN_EXTENSION)
    pub extension: String,
}

/// Counts of lines the parser did not turn into records, by reason
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkipSummary {
    pub blank_lines: usize,
    pub directory_markers: usize,
    pub insufficient_fields: usize,
    pub invalid_size: usize,
    pub invalid_day: usize,
    pub invalid_year: usize,
}

impl SkipSummary {
    /// Lines skipped because they were malformed, as opposed to structural lines
    pub fn malformed(&self) -> usize {
        self.insufficient_fields + self.invalid_size + self.invalid_day + self.invalid_year
    }

    pub fn total(&self) -> usize {
        self.blank_lines + self.directory_markers + self.malformed()
    }
}

/// All records loaded from one listing file
#[derive(Debug, Clone)]
pub struct ParsedListing {
    /// Short name used for output directories and plot legends
    pub label: String,
    pub records: Vec<FileRecord>,
    pub skipped: SkipSummary,
    /// Number of lines read, including skipped ones
    pub lines_read: usize,
}

impl ParsedListing {
    /// Iterates over regular file entries, the subset all derived statistics use
    pub fn regular_files(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|record| record.is_regular())
    }
}
