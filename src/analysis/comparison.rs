//! Cross-listing comparison plots
//!
//! When several listings are analysed in one run (for example the paper and
//! poster directories of a conference site), their size distributions are
//! drawn on shared charts:
//! - `cdf_plot_combined.png` - Overlaid size CDFs with a legend
//! - `pdf_plot_combined.png` - Side-by-side size PDFs

use super::file_size::size_distribution_series;
use crate::common::data_structures::ParsedListing;
use crate::common::plots::{create_size_cdf_plot, create_size_pdf_plot, PlotSeries};
use crate::common::PlotError;
use std::path::Path;
use tracing::warn;

type Result<T> = core::result::Result<T, PlotError>;

/// PDF and CDF series of every listing that has regular files
fn comparison_series(listings: &[ParsedListing]) -> (Vec<PlotSeries>, Vec<PlotSeries>) {
    listings
        .iter()
        .filter_map(|listing| {
            let series = size_distribution_series(listing);
            if series.is_none() {
                warn!(listing = %listing.label, "No regular files, left out of comparison");
            }
            series
        })
        .unzip()
}

/// Generate the comparison plots for two or more listings
///
/// # Arguments
/// * `listings` - Parsed listings to compare
/// * `output_dir` - Directory where the PNG files should be saved
///
/// # Returns
/// * `Ok(())` - If the plots were generated, or fewer than two listings had data
/// * `Err(PlotError)` - If plot generation failed
pub fn generate_comparison_plots(listings: &[ParsedListing], output_dir: &Path) -> Result<()> {
    let (pdfs, cdfs) = comparison_series(listings);
    if cdfs.len() < 2 {
        return Ok(());
    }

    let labels: Vec<&str> = cdfs.iter().map(|series| series.label.as_str()).collect();
    let title = format!("CDF of File Sizes for {}", labels.join(" and "));

    create_size_cdf_plot(&cdfs, &title, &output_dir.join("cdf_plot_combined.png"))?;
    create_size_pdf_plot(&pdfs, &output_dir.join("pdf_plot_combined.png"))?;

    Ok(())
}
