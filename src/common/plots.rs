//! Plotting infrastructure for distribution charts
//!
//! This module provides functionality to create probability (PDF) bar charts and
//! cumulative distribution (CDF) step charts using the [`plotters`] crate. Charts
//! are saved as PNG files with fixed 1200x800 resolution.

use crate::analysis::constants::{GB_F64, KB_F64, MB_F64, TB_F64};
use crate::common::statistics::Sample;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Chart resolution in pixels
const PLOT_SIZE: (u32, u32) = (1200, 800);

/// Multiplicative half-width of a PDF bar on the logarithmic size axis
const BAR_SPREAD: f64 = 1.03;

/// Headroom above the tallest value on probability axes
const Y_HEADROOM: f64 = 1.1;

/// Tolerance for cumulative probabilities that overshoot 1.0 by rounding
const PROBABILITY_EPSILON: f64 = 1e-9;

/// Colours cycled through when several series share a chart
const SERIES_COLORS: [RGBColor; 6] = [BLUE, RED, GREEN, MAGENTA, CYAN, BLACK];

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// A labelled set of `(x, probability)` points
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl PlotSeries {
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    /// Builds a series from integer-keyed probabilities
    pub fn from_samples<T: Sample>(label: impl Into<String>, points: &[(T, f64)]) -> Self {
        Self::new(
            label,
            points
                .iter()
                .map(|&(value, probability)| (value.as_f64(), probability))
                .collect(),
        )
    }
}

/// Formats byte sizes into human-friendly units for chart labels
///
/// Converts byte values into appropriate base-10 units (B, kB, MB, GB, TB) with proper
/// rounding to avoid fractional bytes and ensure readable chart labels.
fn format_byte_size(bytes: f64) -> String {
    let abs_bytes = bytes.abs();

    if abs_bytes >= TB_F64 {
        format!("{:.0}TB", (bytes / TB_F64).round())
    } else if abs_bytes >= GB_F64 {
        format!("{:.0}GB", (bytes / GB_F64).round())
    } else if abs_bytes >= MB_F64 {
        format!("{:.0}MB", (bytes / MB_F64).round())
    } else if abs_bytes >= KB_F64 {
        format!("{:.0}kB", (bytes / KB_F64).round())
    } else {
        format!("{:.0}B", bytes.round())
    }
}

/// Formats a probability (0.0 to 1.0) as a whole percentage
fn format_probability(probability: f64) -> String {
    format!("{:.0}%", probability * 100.0)
}

/// Expands points into a post-step polyline
///
/// Each value holds until the next x, where the line rises vertically, the
/// same shape as `where='post'` step charts.
pub fn step_points(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut stepped = Vec::with_capacity(points.len() * 2);
    let mut previous: Option<f64> = None;

    for &(x, y) in points {
        if let Some(previous_y) = previous {
            stepped.push((x, previous_y));
        }
        stepped.push((x, y));
        previous = Some(y);
    }

    stepped
}

/// Rejects empty series and probabilities outside 0..=1
fn validate_series(series: &[PlotSeries]) -> Result<()> {
    if series.is_empty() {
        return Err(PlotError::InvalidData("No series to plot".to_string()));
    }

    for entry in series {
        if entry.points.is_empty() {
            return Err(PlotError::InvalidData(format!(
                "Series '{}' cannot be empty",
                entry.label
            )));
        }

        for (_, probability) in &entry.points {
            if *probability < 0.0 || *probability > 1.0 + PROBABILITY_EPSILON {
                return Err(PlotError::InvalidData(format!(
                    "Probability {:.4} in series '{}' is outside valid range 0-1",
                    probability, entry.label
                )));
            }
        }
    }

    Ok(())
}

/// Logarithmic axis bounds for byte sizes, never below 1 byte
fn log_axis_range<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> (f64, f64) {
    let (x_min, x_max) = points.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (x, _)| {
        (lo.min(*x), hi.max(*x))
    });

    // Ensure x_min >= 1.0 to avoid log(0) domain errors
    let x_min = x_min.max(1.0);
    let mut x_max = x_max.max(1.0);

    // If every point sits on one value, widen to a full decade
    if x_min >= x_max {
        x_max = x_min * 10.0;
    }

    (x_min, x_max)
}

/// Creates a size CDF step chart with a logarithmic size axis and saves it as PNG
///
/// Several series are overlaid in distinct colours with a legend, which is
/// how listings are compared against each other.
///
/// # Arguments
/// * `series` - One or more series of `(size_bytes, cumulative_probability)` points
/// * `title` - Chart title displayed at the top of the plot
/// * `output_path` - Path where the PNG file should be saved
///
/// # Chart Properties
/// * Resolution: 1200x800 pixels
/// * X-axis: Logarithmic (base 10) byte sizes; zero-byte sizes sit on the 1 byte line
/// * Y-axis: 0-110%, percentage formatted
pub fn create_size_cdf_plot(series: &[PlotSeries], title: &str, output_path: &Path) -> Result<()> {
    validate_series(series)?;

    let drawing_area = BitMapBackend::new(output_path, PLOT_SIZE).into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let (x_min, x_max) = log_axis_range(series.iter().flat_map(|entry| entry.points.iter()));

    let mut chart_context = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d((x_min..x_max).log_scale(), 0.0..Y_HEADROOM)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart_context
        .configure_mesh()
        .x_desc("File Size (bytes, log scale)")
        .y_desc("Cumulative Probability")
        .label_style(("sans-serif", 25))
        .x_label_formatter(&|x| format_byte_size(*x))
        .y_label_formatter(&|y| format_probability(*y))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (index, entry) in series.iter().enumerate() {
        let color = SERIES_COLORS[index % SERIES_COLORS.len()];
        let clamped: Vec<(f64, f64)> = entry
            .points
            .iter()
            .map(|&(x, y)| (x.max(x_min), y))
            .collect();

        chart_context
            .draw_series(LineSeries::new(step_points(&clamped), color.stroke_width(2)))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(entry.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if series.len() > 1 {
        chart_context
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", 25))
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates size PDF bar charts, one panel per series side by side, and saves them as PNG
///
/// # Arguments
/// * `series` - One or more series of `(size_bytes, probability)` points
/// * `output_path` - Path where the PNG file should be saved
///
/// # Chart Properties
/// * Resolution: 1200x800 pixels, split evenly between panels
/// * X-axis: Logarithmic (base 10) byte sizes
/// * Y-axis: 0 to 110% of the most likely size, percentage formatted
pub fn create_size_pdf_plot(series: &[PlotSeries], output_path: &Path) -> Result<()> {
    validate_series(series)?;

    let drawing_area = BitMapBackend::new(output_path, PLOT_SIZE).into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let panels = drawing_area.split_evenly((1, series.len()));

    for (index, (panel, entry)) in panels.iter().zip(series).enumerate() {
        let color = SERIES_COLORS[index % SERIES_COLORS.len()];
        let (x_min, x_max) = log_axis_range(entry.points.iter());
        let y_max = entry
            .points
            .iter()
            .map(|(_, probability)| *probability)
            .fold(0.0, f64::max)
            * Y_HEADROOM;

        let mut chart_context = ChartBuilder::on(panel)
            .caption(format!("PDF - {}", entry.label), ("sans-serif", 40))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(85)
            .build_cartesian_2d(
                (x_min / BAR_SPREAD..x_max * BAR_SPREAD).log_scale(),
                0.0..y_max,
            )
            .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

        chart_context
            .configure_mesh()
            .x_desc("File Size (bytes, log scale)")
            .y_desc("Probability")
            .label_style(("sans-serif", 25))
            .x_label_formatter(&|x| format_byte_size(*x))
            .y_label_formatter(&|y| format!("{:.1}%", y * 100.0))
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        chart_context
            .draw_series(entry.points.iter().map(|&(x, probability)| {
                let x = x.max(x_min);
                Rectangle::new(
                    [(x / BAR_SPREAD, 0.0), (x * BAR_SPREAD, probability)],
                    color.filled(),
                )
            }))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates a file age CDF step chart on a linear day axis and saves it as PNG
///
/// # Arguments
/// * `series` - `(age_days, cumulative_probability)` points, ascending by age
/// * `output_path` - Path where the PNG file should be saved
pub fn create_age_cdf_plot(series: &PlotSeries, output_path: &Path) -> Result<()> {
    validate_series(std::slice::from_ref(series))?;

    let drawing_area = BitMapBackend::new(output_path, PLOT_SIZE).into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let x_min = series.points.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let mut x_max = series
        .points
        .iter()
        .map(|(x, _)| *x)
        .fold(f64::NEG_INFINITY, f64::max);
    if x_min >= x_max {
        x_max = x_min + 1.0;
    }

    let mut chart_context = ChartBuilder::on(&drawing_area)
        .caption(
            "Cumulative Distribution Function (CDF) of File Ages",
            ("sans-serif", 40),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_min..x_max, 0.0..Y_HEADROOM)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart_context
        .configure_mesh()
        .x_desc("File Age (days)")
        .y_desc("Probability")
        .label_style(("sans-serif", 25))
        .x_label_formatter(&|x| format!("{:.0}", x.round()))
        .y_label_formatter(&|y| format_probability(*y))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart_context
        .draw_series(LineSeries::new(
            step_points(&series.points),
            SERIES_COLORS[0].stroke_width(2),
        ))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_cdf() -> PlotSeries {
        PlotSeries::new(
            "paper",
            vec![(0.0, 0.1), (10.0, 0.3), (1000.0, 0.7), (100000.0, 1.0)],
        )
    }

    #[test]
    fn test_step_points() {
        let stepped = step_points(&[(1.0, 0.25), (2.0, 0.5), (4.0, 1.0)]);
        assert_eq!(
            stepped,
            vec![
                (1.0, 0.25),
                (2.0, 0.25),
                (2.0, 0.5),
                (4.0, 0.5),
                (4.0, 1.0)
            ]
        );
        assert!(step_points(&[]).is_empty());
    }

    #[test]
    fn test_from_samples() {
        let series = PlotSeries::from_samples("ages", &[(3i64, 0.5), (7i64, 1.0)]);
        assert_eq!(series.label, "ages");
        assert_eq!(series.points, vec![(3.0, 0.5), (7.0, 1.0)]);
    }

    #[test]
    fn test_log_axis_range() {
        let points = [(0.0, 0.5), (500.0, 1.0)];
        assert_eq!(log_axis_range(points.iter()), (1.0, 500.0));

        let single = [(42.0, 1.0)];
        assert_eq!(log_axis_range(single.iter()), (42.0, 420.0));
    }

    #[test]
    fn test_plot_validation() {
        let output_path = std::env::temp_dir().join("test_plot_validation.png");

        // Test no series
        let result = create_size_cdf_plot(&[], "Test", &output_path);
        assert!(matches!(result, Err(PlotError::InvalidData(_))));

        // Test empty series
        let empty = PlotSeries::new("empty", vec![]);
        let result = create_size_pdf_plot(std::slice::from_ref(&empty), &output_path);
        assert!(matches!(result, Err(PlotError::InvalidData(_))));

        // Test invalid probability (negative)
        let negative = PlotSeries::new("negative", vec![(1.0, -0.1)]);
        let result = create_age_cdf_plot(&negative, &output_path);
        assert!(matches!(result, Err(PlotError::InvalidData(_))));

        // Test invalid probability (>1)
        let too_large = PlotSeries::new("too large", vec![(1.0, 1.5)]);
        let result = create_size_cdf_plot(&[too_large], "Test", &output_path);
        assert!(matches!(result, Err(PlotError::InvalidData(_))));
    }

    #[test]
    fn test_validation_tolerates_rounding_overshoot() {
        let series = PlotSeries::new("cdf", vec![(1.0, 0.5), (2.0, 1.0 + 1e-12)]);
        assert!(validate_series(&[series]).is_ok());
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn test_create_plots_success() {
        let temp_dir = std::env::temp_dir().join("listing_plot_tests");
        fs::create_dir_all(&temp_dir).unwrap();

        let cdf = sample_cdf();
        let other = PlotSeries::new("poster", vec![(100.0, 0.5), (1e6, 1.0)]);

        let combined = temp_dir.join("cdf_plot_combined.png");
        create_size_cdf_plot(&[cdf.clone(), other.clone()], "CDF", &combined).unwrap();
        assert!(combined.exists());

        let pdf = temp_dir.join("pdf_plot_combined.png");
        let pdf_series = PlotSeries::new("paper", vec![(10.0, 0.5), (1000.0, 0.5)]);
        create_size_pdf_plot(&[pdf_series, other], &pdf).unwrap();
        assert!(pdf.exists());

        let ages = temp_dir.join("cdf_date_plot.png");
        let age_series = PlotSeries::new("ages", vec![(-3.0, 0.25), (100.0, 0.5), (4000.0, 1.0)]);
        create_age_cdf_plot(&age_series, &ages).unwrap();
        assert!(ages.exists());

        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_format_byte_size() {
        assert_eq!(format_byte_size(0.0), "0B");
        assert_eq!(format_byte_size(512.0), "512B");
        assert_eq!(format_byte_size(1000.0), "1kB");
        assert_eq!(format_byte_size(1500.0), "2kB");
        assert_eq!(format_byte_size(10.0 * 1000.0 * 1000.0), "10MB");
        assert_eq!(format_byte_size(1000.0 * 1000.0 * 1000.0), "1GB");
        assert_eq!(format_byte_size(1000.0 * 1000.0 * 1000.0 * 1000.0), "1TB");
    }

    #[test]
    fn test_format_probability() {
        assert_eq!(format_probability(0.0), "0%");
        assert_eq!(format_probability(0.5), "50%");
        assert_eq!(format_probability(1.0), "100%");
    }
}
