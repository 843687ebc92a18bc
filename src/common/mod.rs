//! Common infrastructure modules shared across analysis phases
//!
//! This module provides reusable infrastructure for:
//! - Bucket types and ASCII table formatting
//! - Data structures for parsed listings
//! - Descriptive statistics
//! - CSV export
//! - Plotting PDF and CDF charts

pub mod buckets;
pub mod csv_output;
pub mod data_structures;
pub mod plots;
pub mod statistics;

// Re-export commonly used items
pub use data_structures::ParsedListing;
pub use plots::PlotError;
