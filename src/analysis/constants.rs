//! Constants shared by the analysis modules
//!
//! Provides decimal (base-1000) size unit constants along with the defaults
//! used when grouping files by type. Both integer and floating-point size
//! variants are available for different use cases.

/// Kilobyte constant (1,000 bytes)
pub const KB: u64 = 1000;

/// Megabyte constant (1,000 KB)
pub const MB: u64 = KB * 1000;

/// Gigabyte constant (1,000 MB)
pub const GB: u64 = MB * 1000;

/// Kilobyte constant as f64 (1,000.0 bytes)
pub const KB_F64: f64 = 1000.0;

/// Megabyte constant as f64 (1,000.0 KB)
pub const MB_F64: f64 = KB_F64 * 1000.0;

/// Gigabyte constant as f64 (1,000.0 MB)
pub const GB_F64: f64 = MB_F64 * 1000.0;

/// Terabyte constant as f64 (1,000.0 GB)
pub const TB_F64: f64 = GB_F64 * 1000.0;

/// Days in a (non-leap) year, for age bucket labels
pub const DAYS_PER_YEAR: i64 = 365;

/// Extension assigned to filenames without a `.`
pub const UNKNOWN_EXTENSION: &str = "Unknown";

/// Number of known extensions kept in the file type table
pub const DEFAULT_TOP_EXTENSIONS: usize = 10;
