//! Domain-specific analysis modules
//!
//! This module contains domain-specific analysis logic for:
//! - Derived columns (date, age, extension)
//! - File size analysis
//! - File age analysis
//! - File type analysis
//! - Cross-listing comparison
//! - The JSON summary

pub mod comparison;
pub mod constants;
pub mod derived_columns;
pub mod file_age;
pub mod file_size;
pub mod file_type;
pub mod summary;

// Re-export analysis functions for convenience
pub use comparison::generate_comparison_plots;
pub use derived_columns::annotate;
pub use file_age::{generate_file_age_analysis, generate_file_age_plots};
pub use file_size::{generate_file_size_analysis, generate_file_size_plots};
pub use file_type::generate_file_type_analysis;
pub use summary::{write_summary, EntryCounts, ListingReport};
